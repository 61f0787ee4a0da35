pub mod authentication;
pub mod registration;
pub mod response;

#[cfg(test)]
pub(crate) mod fakes;
