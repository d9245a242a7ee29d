use crate::error::CliError;
use secrecy::SecretString;
use std::io::{stdin, stdout, Write};

/// Trait for handling command line input/output to allow mocking in tests.
pub trait IoHandler {
    fn read_line(&mut self, prompt: &str) -> Result<String, CliError>;
    /// Reads a line that should not be echoed back or logged (passwords).
    fn read_secret(&mut self, prompt: &str) -> Result<SecretString, CliError>;
    fn write_line(&mut self, line: &str) -> Result<(), CliError>;
}

/// Standard I/O handler using stdin and stdout.
#[derive(Default)]
pub struct StdIoHandler;

impl IoHandler for StdIoHandler {
    fn read_line(&mut self, prompt: &str) -> Result<String, CliError> {
        print!("{} ", prompt);
        stdout().flush().map_err(CliError::Io)?;
        let mut input = String::new();
        stdin().read_line(&mut input).map_err(CliError::Io)?;
        Ok(input.trim().to_string())
    }

    fn read_secret(&mut self, prompt: &str) -> Result<SecretString, CliError> {
        let input = self.read_line(prompt)?;
        Ok(SecretString::new(input.into_boxed_str()))
    }

    fn write_line(&mut self, line: &str) -> Result<(), CliError> {
        println!("{}", line);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::io::Cursor;

    // A testable IoHandler that reads from a string buffer and writes to one.
    pub(crate) struct TestIoHandler {
        input: Cursor<Vec<u8>>,
        output: Vec<u8>,
    }

    impl TestIoHandler {
        pub(crate) fn new(input: &str) -> Self {
            Self {
                input: Cursor::new(input.as_bytes().to_vec()),
                output: Vec::new(),
            }
        }

        pub(crate) fn output_as_string(&self) -> String {
            String::from_utf8_lossy(&self.output).to_string()
        }
    }

    impl IoHandler for TestIoHandler {
        fn read_line(&mut self, prompt: &str) -> Result<String, CliError> {
            write!(&mut self.output, "{} ", prompt).map_err(CliError::Io)?;
            let mut buf = String::new();
            std::io::BufRead::read_line(&mut self.input, &mut buf).map_err(CliError::Io)?;
            Ok(buf.trim().to_string())
        }

        fn read_secret(&mut self, prompt: &str) -> Result<SecretString, CliError> {
            let input = self.read_line(prompt)?;
            Ok(SecretString::new(input.into_boxed_str()))
        }

        fn write_line(&mut self, line: &str) -> Result<(), CliError> {
            writeln!(&mut self.output, "{}", line).map_err(CliError::Io)?;
            Ok(())
        }
    }

    #[test]
    fn test_read_line() {
        let mut io = TestIoHandler::new("test input\n");
        let result = io.read_line("Prompt:").unwrap();
        assert_eq!(result, "test input");
        assert_eq!(io.output_as_string(), "Prompt: ");
    }

    #[test]
    fn test_read_secret_trims_like_read_line() {
        let mut io = TestIoHandler::new("  hunter2  \n");
        let secret = io.read_secret("Password:").unwrap();
        assert_eq!(secret.expose_secret(), "hunter2");
    }

    #[test]
    fn test_write_line() {
        let mut io = TestIoHandler::new("");
        io.write_line("Hello, world!").unwrap();
        assert_eq!(io.output_as_string(), "Hello, world!\n");
    }
}
