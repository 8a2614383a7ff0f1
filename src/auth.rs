use anyhow::{Result, bail};
use std::io::{self, BufRead, IsTerminal};
use zeroize::Zeroizing;

/// Reads a password for verification.
pub fn read_password() -> Result<Zeroizing<String>> {
    //  stdin (Pipeline)
    //  printf "%s\n" "$PW" | scrypt-kdf --prompt --check "$HASH"
    if !io::stdin().is_terminal() {
        return read_piped_line();
    }

    //  Interactive (TTY)
    Ok(Zeroizing::new(rpassword::prompt_password("Password: ")?))
}

/// Reads a password for a new hash, asking twice on a terminal.
pub fn read_new_password() -> Result<Zeroizing<String>> {
    if !io::stdin().is_terminal() {
        return read_piped_line();
    }

    let pw1 = Zeroizing::new(rpassword::prompt_password("Password: ")?);
    let pw2 = Zeroizing::new(rpassword::prompt_password("Confirm password: ")?);

    if pw1 != pw2 {
        bail!("passwords do not match");
    }

    Ok(pw1)
}

fn read_piped_line() -> Result<Zeroizing<String>> {
    let mut buf = Zeroizing::new(String::new());
    if io::stdin().lock().read_line(&mut buf)? == 0 {
        bail!("no password provided on stdin");
    }
    trim_newline(&mut buf);
    Ok(buf)
}

fn trim_newline(s: &mut String) {
    while s.ends_with('\n') || s.ends_with('\r') {
        s.pop();
    }
}
