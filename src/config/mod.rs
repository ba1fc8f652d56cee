mod filter;
mod loader;
mod model;

pub use filter::ExcludeFilter;
pub use loader::{
    ConfigLoader, FileConfigLoader, FileSystem, LOCAL_CONFIG_NAMES, LoadResult, RealFileSystem,
    USER_CONFIG_NAME,
};
pub use model::{DEFAULT_PLUGIN_DIRECTORIES, EnabledState, LintConfig, RuleConfig};
