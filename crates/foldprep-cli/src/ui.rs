use crate::cli::OverwriteArg;
use crate::error::{CliError, Result};
use foldprep::core::io::output_location::OverwritePolicy;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::Path;

/// Turns the requested overwrite behavior into a concrete policy, asking on the terminal
/// only when the output folder already exists and stdin is interactive.
pub fn resolve_overwrite_policy(requested: &Path, arg: OverwriteArg) -> Result<OverwritePolicy> {
    match arg {
        OverwriteArg::Fail => Ok(OverwritePolicy::Fail),
        OverwriteArg::Overwrite => Ok(OverwritePolicy::Overwrite),
        OverwriteArg::Redirect => Ok(OverwritePolicy::Redirect),
        OverwriteArg::Ask if !requested.exists() => Ok(OverwritePolicy::Fail),
        OverwriteArg::Ask if io::stdin().is_terminal() => {
            let stdin = io::stdin();
            let mut stdout = io::stdout();
            ask_overwrite(requested, &mut stdin.lock(), &mut stdout)
        }
        OverwriteArg::Ask => Ok(OverwritePolicy::Fail),
    }
}

/// `y` deletes the folder, anything else redirects to a timestamped sibling.
pub fn ask_overwrite(
    requested: &Path,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Result<OverwritePolicy> {
    write!(
        output,
        "Output folder '{}' already exists. Delete it and create a new one? (y/n): ",
        requested.display()
    )?;
    output.flush()?;

    let mut answer = String::new();
    let read = input.read_line(&mut answer)?;
    if read == 0 {
        return Err(CliError::Argument(
            "no answer given to the overwrite prompt".to_string(),
        ));
    }

    if answer.trim().eq_ignore_ascii_case("y") {
        Ok(OverwritePolicy::Overwrite)
    } else {
        Ok(OverwritePolicy::Redirect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn ask(answer: &str) -> (Result<OverwritePolicy>, String) {
        let mut input = Cursor::new(answer.as_bytes().to_vec());
        let mut output = Vec::new();
        let policy = ask_overwrite(Path::new("results"), &mut input, &mut output);
        (policy, String::from_utf8(output).unwrap())
    }

    #[test]
    fn yes_means_overwrite() {
        let (policy, prompt) = ask("y\n");
        assert_eq!(policy.unwrap(), OverwritePolicy::Overwrite);
        assert!(prompt.contains("Output folder 'results' already exists"));

        assert_eq!(ask("Y\n").0.unwrap(), OverwritePolicy::Overwrite);
    }

    #[test]
    fn anything_else_means_redirect() {
        assert_eq!(ask("n\n").0.unwrap(), OverwritePolicy::Redirect);
        assert_eq!(ask("yes please\n").0.unwrap(), OverwritePolicy::Redirect);
        assert_eq!(ask("\n").0.unwrap(), OverwritePolicy::Redirect);
    }

    #[test]
    fn closed_input_is_an_error() {
        assert!(matches!(ask("").0, Err(CliError::Argument(_))));
    }

    #[test]
    fn explicit_policies_skip_the_prompt() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            resolve_overwrite_policy(dir.path(), OverwriteArg::Redirect).unwrap(),
            OverwritePolicy::Redirect
        );
        assert_eq!(
            resolve_overwrite_policy(dir.path(), OverwriteArg::Overwrite).unwrap(),
            OverwritePolicy::Overwrite
        );
    }

    #[test]
    fn ask_on_a_missing_folder_needs_no_answer() {
        let dir = tempfile::tempdir().unwrap();
        let policy = resolve_overwrite_policy(&dir.path().join("new"), OverwriteArg::Ask).unwrap();
        assert_eq!(policy, OverwritePolicy::Fail);
    }
}
