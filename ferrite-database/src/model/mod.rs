pub mod installed_module;
pub mod note;
