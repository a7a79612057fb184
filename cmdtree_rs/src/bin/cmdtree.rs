use std::any::Any;
use std::panic;
use std::process::ExitCode;

use cmdtree::cli::{exit_status, run};

fn install_broken_pipe_handler() {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let payload = info.payload();
        let is_broken = <dyn Any>::downcast_ref::<&str>(payload)
            .is_some_and(|s| s.contains("Broken pipe"))
            || <dyn Any>::downcast_ref::<String>(payload)
                .is_some_and(|s| s.contains("Broken pipe"));

        if is_broken {
            // Quietly exit when downstream closes the pipe (e.g. piping to `head`).
            std::process::exit(0);
        }

        default_hook(info);
    }));
}

#[tokio::main]
async fn main() -> ExitCode {
    install_broken_pipe_handler();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(args).await {
        Ok(code) => ExitCode::from(exit_status(code)),
        Err(err) => {
            eprintln!("[cmdtree][error] {err:#}");
            ExitCode::FAILURE
        }
    }
}
