use std::fs;
use std::path::Path;

use clap::CommandFactory;

#[path = "src/cli.rs"]
mod cli;

/// Man pages land in `$OUT_DIR/man`: `netmagis.1`, then one page per
/// subcommand named `netmagis-<sub>.1` (`netmagis-config-set-password.1`).
fn main() {
    println!("cargo::rerun-if-changed=src/cli.rs");

    let out_dir = std::env::var_os("OUT_DIR").expect("cargo sets OUT_DIR for build scripts");
    let man_dir = Path::new(&out_dir).join("man");
    fs::create_dir_all(&man_dir).expect("man directory must be creatable under OUT_DIR");

    let mut pending = vec![cli::Cli::command()];
    while let Some(cmd) = pending.pop() {
        let page_name = cmd.get_name().to_owned();
        for sub in cmd.get_subcommands().filter(|s| !s.is_hide_set()) {
            pending.push(sub.clone().name(format!("{page_name}-{}", sub.get_name())));
        }
        write_page(cmd, &man_dir.join(format!("{page_name}.1")));
    }
}

fn write_page(cmd: clap::Command, path: &Path) {
    let mut roff = Vec::new();
    clap_mangen::Man::new(cmd)
        .render(&mut roff)
        .unwrap_or_else(|e| panic!("rendering {}: {e}", path.display()));
    fs::write(path, roff).unwrap_or_else(|e| panic!("writing {}: {e}", path.display()));
}
