pub mod check;
pub mod init;
pub mod rules;

pub use check::{load_config, run_check, run_check_impl};
pub use init::{generate_config_template, run_init, run_init_impl};
pub use rules::{run_rules, write_rules};
