pub mod create;
pub mod detail;
pub mod edit;
pub mod home;
pub mod login;
pub mod not_found;
pub mod signup;
