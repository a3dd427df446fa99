pub(crate) mod command;
pub(crate) mod document;
pub(crate) mod lro;
pub(crate) mod request;
pub(crate) mod response;
