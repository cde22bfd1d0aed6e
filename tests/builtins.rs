mod cases;

test_case!(
    display_logs_its_argument,
    input: "display(1 + 1); display(\"done\");",
    steps: &[
        "display(1 + 1);\ndisplay(\"done\");",
        "display(2);\ndisplay(\"done\");",
        "2;\ndisplay(\"done\");",
        "display(\"done\");",
        "\"done\";",
    ],
    output: &["2", "\"done\""],
);

test_case!(
    math_functions,
    input: "math_max(math_abs(-3), math_sqrt(16));",
    steps: &[
        "math_max(math_abs(-3), math_sqrt(16));",
        "math_max(math_abs(-3), math_sqrt(16));",
        "math_max(3, math_sqrt(16));",
        "math_max(3, 4);",
        "4;",
    ],
);

test_case!(
    math_constants_are_looked_up,
    input: "math_PI > 3;",
    steps: &["math_PI > 3;", "3.141592653589793 > 3;", "true;"],
);

test_case!(
    natives_can_be_passed_around,
    input: "const apply = (f, x) => f(x); apply(math_floor, 2.5);",
    last: "2;",
);

test_case!(
    predicates,
    input: "is_number(1) && is_string(\"s\") && is_function(x => x) && !is_boolean(0);",
    last: "true;",
);

test_case!(
    stringify_and_parse_int,
    input: "parse_int(stringify(12) + \"3\", 10) + 1;",
    last: "124;",
);

test_case!(
    undefined_is_a_global,
    input: "is_undefined(undefined);",
    steps: &["is_undefined(undefined);", "is_undefined(undefined);", "true;"],
);

test_case!(
    infinity_and_nan,
    input: "1 / 0 === Infinity;",
    last: "true;",
);
