use std::io::{BufRead, Write};

use giftcat::{Destination, Navigator, Notice, Notifier};

/// Terminal stand-in for the browser: navigation goes to stdout, notices to
/// stderr. With `confirm_notices` each notice waits for Enter.
pub struct TerminalHost {
    confirm_notices: bool,
}

impl TerminalHost {
    pub fn new(confirm_notices: bool) -> Self {
        Self { confirm_notices }
    }
}

impl Navigator for TerminalHost {
    fn navigate(&self, destination: &Destination) {
        println!("{}", destination.href());
    }
}

impl Notifier for TerminalHost {
    fn notify(&self, notice: Notice) {
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(stderr, "{}", notice.message());

        if self.confirm_notices {
            let _ = write!(stderr, "Press Enter to continue...");
            let _ = stderr.flush();
            let mut line = String::new();
            let _ = std::io::stdin().lock().read_line(&mut line);
        }
    }
}
