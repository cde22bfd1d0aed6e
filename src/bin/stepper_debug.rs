use bumpalo::Bump;
use std::env;
use stepper::{Stepper, StepperOptions, render_error};

fn main() {
    let args: Vec<String> = env::args().collect();
    let Some(source) = args.get(1) else {
        let program = args.first().map_or("stepper_debug", String::as_str);
        eprintln!("usage: {} <program> [step-limit]", program);
        std::process::exit(2);
    };
    let step_limit = args.get(2).and_then(|limit| limit.parse().ok());

    let arena = Bump::new();
    let stepper = Stepper::new(&arena, StepperOptions { step_limit });
    let evaluation = match stepper.evaluate(source) {
        Ok(evaluation) => evaluation,
        Err(e) => {
            render_error(&e);
            std::process::exit(1);
        }
    };

    for (index, step) in evaluation.rendered.iter().enumerate() {
        println!("── step {} ──", index);
        println!("{}", step);
    }

    if !evaluation.output.is_empty() {
        println!("── output ──");
        for line in &evaluation.output {
            println!("{}", line);
        }
    }

    if let Some(e) = evaluation.error() {
        render_error(&e);
        std::process::exit(1);
    }
}
