pub(crate) mod dhcp;
pub(crate) mod http;
pub(crate) mod ws;
