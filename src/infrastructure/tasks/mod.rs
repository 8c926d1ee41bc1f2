pub(crate) mod dhcp_server;
pub(crate) mod http_server;
pub(crate) mod network;
pub(crate) mod tick;

pub use dhcp_server::dhcp_server_task;
pub use http_server::{HTTP_WORKERS, http_server_task};
pub use network::{access_point_task, network_runner_task};
pub use tick::tick_task;
