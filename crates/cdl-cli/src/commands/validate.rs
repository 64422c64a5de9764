//! `validate` command: parse a CDL expression and report its parse tree.

use crate::output::{print_error, print_success};
use crate::{read_cdl_arg, Error, Result};

pub fn execute(cdl: &str) -> Result<()> {
    let cdl = read_cdl_arg(cdl)?;
    match cdl_core::pipeline::parse_only(&cdl) {
        Ok((parsed, warnings)) => {
            for w in &warnings {
                println!("warning: {w}");
            }
            let forms = parsed.flattened_forms();
            print_success(&format!(
                "{} [{}], {} form(s)",
                parsed.system.as_str(),
                parsed.point_group,
                forms.len()
            ));
            for form in &forms {
                println!("  {} @ {}", form.miller.to_brace_string(), form.scale);
            }
            Ok(())
        }
        Err(e) => {
            print_error(&e.to_string());
            Err(Error::from(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_cdl_succeeds() {
        assert!(execute("cubic[m3m]:{100}@1").is_ok());
    }

    #[test]
    fn malformed_cdl_fails() {
        assert!(execute("").is_err());
    }
}
