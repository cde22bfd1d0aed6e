/// Declares a test that steps `input` and checks the outcome.
///
/// Every field after `input` is optional, but they must appear in this order:
/// - `steps`: the whole rendered trace.
/// - `last`: the last rendered program of the trace.
/// - `error`: the rendered error that stopped evaluation. Without it, the
///   test requires evaluation to finish cleanly.
/// - `output`: the lines logged by `display`.
#[macro_export]
macro_rules! test_case {
    (
        $name:ident,
        input: $input:expr,
        $( steps: $steps:expr, )?
        $( last: $last:expr, )?
        $( error: $error:expr, )?
        $( output: $output:expr, )?
    ) => {
        #[test]
        fn $name() {
            let arena = bumpalo::Bump::new();
            let stepper = stepper::Stepper::new(&arena, stepper::StepperOptions::default());
            let evaluation = stepper
                .evaluate($input)
                .unwrap_or_else(|e| panic!("Parsing failed for {:?}: {}", $input, e));

            $(
                let expected: Vec<String> = $steps.iter().map(|step| step.to_string()).collect();
                pretty_assertions::assert_eq!(evaluation.rendered, expected);
            )?
            $(
                pretty_assertions::assert_eq!(evaluation.last_step(), Some($last));
            )?

            #[allow(unused_mut)]
            let mut expected_error: Option<&str> = None;
            $( expected_error = Some($error); )?
            let errors: Vec<String> = evaluation.errors.iter().map(|e| e.message()).collect();
            match expected_error {
                Some(message) => pretty_assertions::assert_eq!(errors, vec![message.to_string()]),
                None => assert!(errors.is_empty(), "unexpected errors: {:?}", errors),
            }

            $(
                let expected: Vec<String> = $output.iter().map(|line| line.to_string()).collect();
                pretty_assertions::assert_eq!(evaluation.output, expected);
            )?
        }
    };
}
