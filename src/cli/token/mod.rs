//! Password helper commands: token generation and strength checks

use crate::infrastructure::user::PasswordEncoder;

/// Print a random alphanumeric token
pub fn run_token(length: usize) -> anyhow::Result<()> {
    if length == 0 {
        anyhow::bail!("token length must be greater than zero");
    }

    println!("{}", PasswordEncoder.generate_token(length));
    Ok(())
}

/// Print whether the password meets the strength rules
pub fn run_password_strength(password: &str) -> anyhow::Result<()> {
    println!("{}", strength_label(password));
    Ok(())
}

fn strength_label(password: &str) -> &'static str {
    if PasswordEncoder.is_strong_password(Some(password)) {
        "strong"
    } else {
        "weak"
    }
}
