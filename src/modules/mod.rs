pub mod authors;
pub mod books;
pub mod error;

use library_kernel::ModuleRegistry;

pub use error::ServiceError;

/// Register all domain modules with the registry
pub fn register_all(registry: &mut ModuleRegistry) -> anyhow::Result<()> {
    registry.register(authors::create_module())?;
    registry.register(books::create_module())?;
    Ok(())
}
