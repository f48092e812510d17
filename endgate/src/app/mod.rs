use anyhow::anyhow;

use crate::app::module::Module;

pub mod gate;
pub mod module;

/// The modules a host has loaded, in load order.
#[derive(Default)]
pub struct ModuleRegistry<'a> {
    modules: Vec<Box<dyn Module + 'a>>,
}

impl<'a> ModuleRegistry<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, module: Box<dyn Module + 'a>) {
        log::debug!("Loaded {}", module.name());
        self.modules.push(module);
    }

    /// Starts every module, stopping at the first failure.
    pub fn start_all(&mut self) -> anyhow::Result<()> {
        for module in self.modules.iter_mut() {
            module.start()?;
        }
        Ok(())
    }

    /// Stops running modules in reverse load order.
    ///
    /// Enabled flags are left as they are, so `start_all` brings the same
    /// modules back. `set_enabled(name, true)` on a module that is enabled
    /// but stopped does nothing; use `start_all` instead.
    pub fn stop_all(&mut self) {
        for module in self.modules.iter_mut().rev() {
            if module.is_running() {
                module.stop();
            }
        }
    }

    pub fn set_enabled(&mut self, name: &str, enabled: bool) -> anyhow::Result<()> {
        let module = self
            .get_mut(name)
            .ok_or_else(|| anyhow!("No module named {name:?}"))?;
        log::info!(
            "{} {}",
            if enabled { "Enabling" } else { "Disabling" },
            name
        );
        module.set_enabled(enabled)
    }

    pub fn get(&self, name: &str) -> Option<&(dyn Module + 'a)> {
        self.modules
            .iter()
            .find(|m| m.name() == name)
            .map(|m| m.as_ref())
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut Box<dyn Module + 'a>> {
        self.modules.iter_mut().find(|m| m.name() == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.modules.iter().map(|m| m.name()).collect()
    }
}
