mod cases;

test_case!(
    constants_are_eliminated,
    input: "const num = 2; const negative = -2;",
    steps: &[
        "const num = 2;\nconst negative = -2;",
        "const negative = -2;",
        "const negative = -2;",
    ],
);

test_case!(
    constant_used_twice,
    input: "const x = 3; x * x;",
    steps: &["const x = 3;\nx * x;", "3 * 3;", "9;"],
);

test_case!(
    later_constant_sees_earlier_one,
    input: "const a = 1; const b = a + 1; b;",
    steps: &[
        "const a = 1;\nconst b = a + 1;\nb;",
        "const b = 1 + 1;\nb;",
        "const b = 2;\nb;",
        "2;",
    ],
);

test_case!(
    let_declaration_stops_silently,
    input: "let x = 1; x;",
    steps: &["let x = 1;\nx;"],
);

test_case!(
    declaration_without_initializer_stops_silently,
    input: "1 + 1; const x;",
    steps: &["1 + 1;\nconst x;", "2;\nconst x;", "const x;"],
);

test_case!(
    if_else_chain,
    input: "const n = 5; if (n < 0) { -1; } else if (n === 0) { 0; } else { 1; }",
    steps: &[
        "const n = 5;\nif (n < 0) { -1; } else if (n === 0) { 0; } else { 1; }",
        "if (5 < 0) { -1; } else if (5 === 0) { 0; } else { 1; }",
        "if (false) { -1; } else if (5 === 0) { 0; } else { 1; }",
        "if (5 === 0) { 0; } else { 1; }",
        "if (false) { 0; } else { 1; }",
        "{ 1; }",
        "{}",
    ],
);

test_case!(
    conditional_expression,
    input: "const n = 4; n % 2 === 0 ? \"even\" : \"odd\";",
    last: "\"even\";",
);

test_case!(
    logical_operators_short_circuit,
    input: "false && undefined_name; true || undefined_name;",
    steps: &[
        "false && undefined_name;\ntrue || undefined_name;",
        "false;\ntrue || undefined_name;",
        "true || undefined_name;",
        "true;",
    ],
);

test_case!(
    comments_are_ignored,
    input: "// leading\nconst x = /* inline */ 1;\nx;",
    steps: &["const x = 1;\nx;", "1;"],
);
