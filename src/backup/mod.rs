pub mod backup_config;
pub mod copy;
pub mod filter;
pub mod result_error;
pub mod scheduler;
pub mod validate;
pub mod walk;

macro_rules! function_path {
    () => {
        concat!(module_path!(), "::", function_name!(), " ", file!(), ":", line!())
    };
}

pub(crate) use function_path;
