use crate::core::store::EntityStore;
use crate::domain::report::ReportSection;
use crate::utils::error::Result;

/// Supplies a ready-to-query store, the way a persistence unit hands out an
/// open connection.
pub trait StoreBootstrap {
    fn open(&self) -> Result<EntityStore>;
}

pub trait ReportEmitter {
    fn emit(&mut self, section: &ReportSection) -> Result<()>;

    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

pub trait ReportSettings {
    fn subject(&self) -> &str;
    fn salary_threshold(&self) -> u32;
}
