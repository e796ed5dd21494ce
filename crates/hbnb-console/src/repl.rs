use std::io::{self, BufRead, Write};

use hbnb_store::ObjectStore;

use crate::command::Command;
use crate::console::{Console, Control, Outcome};

/// Prompt shown before each line in interactive sessions.
pub const PROMPT: &str = "(hbnb) ";

/// Read-eval loop over `input` until `quit` or end of input.
///
/// The prompt is only written when `interactive` is set, so piped sessions
/// produce command output alone.
pub fn run<S, R, W>(
    console: &mut Console<S>,
    mut input: R,
    output: &mut W,
    interactive: bool,
) -> io::Result<()>
where
    S: ObjectStore,
    R: BufRead,
    W: Write,
{
    let mut line = String::new();
    loop {
        if interactive {
            write!(output, "{PROMPT}")?;
            output.flush()?;
        }

        line.clear();
        let outcome = if input.read_line(&mut line)? == 0 {
            console.dispatch(Command::Eof)
        } else {
            console.execute(&line)
        };

        if emit(&outcome, output)? == Control::Exit {
            break;
        }
    }
    output.flush()
}

/// Run a fixed list of lines, stopping early on `quit`.
pub fn run_script<S, W>(console: &mut Console<S>, lines: &[String], output: &mut W) -> io::Result<()>
where
    S: ObjectStore,
    W: Write,
{
    for line in lines {
        if emit(&console.execute(line), output)? == Control::Exit {
            break;
        }
    }
    output.flush()
}

fn emit<W: Write>(outcome: &Outcome, output: &mut W) -> io::Result<Control> {
    for line in &outcome.lines {
        writeln!(output, "{line}")?;
    }
    Ok(outcome.control)
}
