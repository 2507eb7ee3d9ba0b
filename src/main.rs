use std::process::ExitCode;

fn main() -> ExitCode {
    pdf_quote_saver_lib::run()
}
