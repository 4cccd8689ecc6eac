//! Opening a local file in the system browser

use medarrivals_common::Result;
use std::path::Path;
use std::process::Command;
use tracing::info;

/// Platform command that opens `path` with the default handler
pub fn open_command(path: &Path) -> Command {
    if cfg!(target_os = "windows") {
        let mut command = Command::new("cmd");
        command.args(["/C", "start", ""]).arg(path);
        command
    } else if cfg!(target_os = "macos") {
        let mut command = Command::new("open");
        command.arg(path);
        command
    } else {
        let mut command = Command::new("xdg-open");
        command.arg(path);
        command
    }
}

/// Launch the browser without waiting for it
pub fn open(path: &Path) -> Result<()> {
    info!("Opening {} in the browser", path.display());
    open_command(path).spawn()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(target_os = "linux")]
    fn test_linux_uses_xdg_open() {
        let command = open_command(Path::new("/tmp/map.html"));
        assert_eq!(command.get_program(), "xdg-open");
        let args: Vec<_> = command.get_args().collect();
        assert_eq!(args, ["/tmp/map.html"]);
    }
}
