use std::io::{Error, ErrorKind};
use std::process::Command;

fn main() {
    // Obtain build information from Git.
    let build_info = from_git().unwrap_or_else(|_| "build info from Git not present".into());
    println!("cargo:rustc-env=BUILD_INFO={}", build_info);
    println!("cargo:rerun-if-changed=.git/HEAD");
}

fn run(args: &[&str]) -> Result<String, Error> {
    let out = Command::new(args[0]).args(&args[1..]).output()?;
    if !out.status.success() {
        return Err(Error::new(ErrorKind::Other, "Command not successful."));
    }
    String::from_utf8(out.stdout)
        .map(|stdout| stdout.trim().to_string())
        .map_err(|err| Error::new(ErrorKind::InvalidData, err))
}

fn from_git() -> Result<String, Error> {
    let rev = run(&["git", "rev-parse", "--verify", "--short", "HEAD"])?;
    let date = run(&["git", "show", "-s", "--format=%cs", "HEAD"])?;
    Ok(format!("{} {}", rev, date))
}
