pub mod action;
pub mod completed;
pub mod config;
pub mod error;
pub mod launcher;
pub mod pipe;
pub mod pump;
pub mod redirect;
pub mod run;
pub mod running;
pub mod signal;
pub mod validator;
