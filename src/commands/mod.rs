mod enable;
mod logs;
mod reload_unit_files;
mod render;
mod start;
mod status;
mod stop;

pub use enable::{disable, enable};
pub use logs::logs;
pub use reload_unit_files::daemon_reload;
pub use render::{render_service, write_mount};
pub use start::start;
pub use status::status;
pub use stop::{kill, restart, stop};

use svcctl::manager::{Manager, Notifier};
use svcctl::StopPolicy;

/// Prints progress messages to stderr
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, msg: &str) {
        eprintln!("{}", msg);
    }
}

fn manager(root: &str) -> Manager {
    Manager::new(root, ConsoleNotifier).with_stop_policy(StopPolicy::from_env())
}
