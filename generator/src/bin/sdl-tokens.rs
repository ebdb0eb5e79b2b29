//! Dumps the significant tokens of an SDL document read from stdin, one
//! output line per input line. Useful when a schema fails to parse and the
//! error position alone does not explain why.

use std::io::Read;
use std::process::ExitCode;

use dt_gql::Lexer;

fn main() -> ExitCode {
    let mut source = String::new();
    if let Err(error) = std::io::stdin().read_to_string(&mut source) {
        eprintln!("error: {error}");
        return ExitCode::FAILURE;
    }

    let mut lexer = Lexer::new(&source);
    let mut line = 0;
    loop {
        match lexer.next() {
            Ok(Some(token)) => {
                if token.line != line {
                    if line != 0 {
                        println!();
                    }
                    line = token.line;
                }
                print!("{}[{}:{}] ", token, token.line, token.column);
            }
            Ok(None) => break,
            Err(error) => {
                eprintln!("error: {error}");
                return ExitCode::FAILURE;
            }
        }
    }
    if line != 0 {
        println!();
    }
    ExitCode::SUCCESS
}
