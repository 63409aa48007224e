// tests/parser_tests.rs

use flux_syntax::ast::*;
use flux_syntax::{parse, Parser, Scanner, TokenSource};
use pretty_assertions::assert_eq;
use time::macros::datetime;

// ============================================================================
// Replay fixture
// ============================================================================

/// Replays a fixed token list, so the grammar can be tested without the
/// real scanner. Handing a regex token to `scan_no_regex` yields `Illegal`.
struct Replay {
    tokens: Vec<Token<'static>>,
    next: usize,
    last: usize,
    rewound: bool,
}

impl Replay {
    fn new(tokens: &[(TokenKind, &'static str)]) -> Self {
        let mut offset = 0;
        let mut replay = Vec::new();
        for &(kind, lexeme) in tokens {
            replay.push(Token::new(Pos(offset), kind, lexeme));
            offset += lexeme.len() + 1;
        }
        replay.push(Token::new(Pos(offset), TokenKind::Eof, ""));
        Replay {
            tokens: replay,
            next: 0,
            last: 0,
            rewound: false,
        }
    }

    fn advance(&mut self) -> Token<'static> {
        let index = self.next.min(self.tokens.len() - 1);
        self.last = self.next;
        self.next = index + 1;
        self.rewound = false;
        self.tokens[index]
    }
}

impl TokenSource<'static> for Replay {
    fn scan_with_regex(&mut self) -> Token<'static> {
        self.advance()
    }

    fn scan_no_regex(&mut self) -> Token<'static> {
        let tok = self.advance();
        if tok.kind == TokenKind::Regex {
            return Token::new(tok.pos, TokenKind::Illegal, tok.lexeme);
        }
        tok
    }

    fn unread(&mut self) {
        if !self.rewound {
            self.next = self.last;
            self.rewound = true;
        }
    }
}

fn replay(tokens: &[(TokenKind, &'static str)]) -> Program {
    Parser::new(Replay::new(tokens))
        .parse_program()
        .unwrap_or_else(|err| panic!("{err}"))
}

fn program(src: &str) -> Program {
    parse(src).unwrap_or_else(|err| panic!("{src}: {err}"))
}

fn single_expression(src: &str) -> Expression {
    let mut body = program(src).body;
    assert_eq!(body.len(), 1, "expected one statement in {src}");
    match body.remove(0) {
        Statement::Expression(stmt) => stmt.expression,
        other => panic!("expected an expression statement, got {other:?}"),
    }
}

fn call(callee: Expression, arguments: Vec<Property>) -> CallExpression {
    CallExpression { callee, arguments }
}

/// Compact prefix rendering of an expression, for precedence tables.
fn sexpr(expr: &Expression) -> String {
    match expr {
        Expression::Identifier(id) => id.name.clone(),
        Expression::Integer(lit) => lit.value.to_string(),
        Expression::Float(lit) => lit.value.to_string(),
        Expression::String(lit) => format!("{:?}", lit.value),
        Expression::Regex(lit) => format!("/{}/", lit.value.as_str()),
        Expression::Duration(lit) => lit
            .values
            .iter()
            .map(|d| format!("{}{}", d.magnitude, d.unit.as_str()))
            .collect(),
        Expression::DateTime(lit) => lit.value.to_string(),
        Expression::PipeLiteral(_) => "<-".to_string(),
        Expression::Unary(u) => format!("({} {})", u.operator.as_str(), sexpr(&u.argument)),
        Expression::Binary(b) => format!(
            "({} {} {})",
            b.operator.as_str(),
            sexpr(&b.left),
            sexpr(&b.right)
        ),
        Expression::Logical(l) => format!(
            "({} {} {})",
            l.operator.as_str(),
            sexpr(&l.left),
            sexpr(&l.right)
        ),
        Expression::Pipe(p) => format!(
            "(|> {} {})",
            sexpr(&p.argument),
            sexpr(&Expression::Call(Box::new(p.call.clone())))
        ),
        Expression::Call(c) => format!("{}({})", sexpr(&c.callee), properties(&c.arguments)),
        Expression::Member(m) => format!("{}.{}", sexpr(&m.object), m.property.name()),
        Expression::Index(i) => format!("{}[{}]", sexpr(&i.array), sexpr(&i.index)),
        Expression::Array(a) => format!(
            "[{}]",
            a.elements.iter().map(sexpr).collect::<Vec<_>>().join(", ")
        ),
        Expression::Object(o) => format!("{{{}}}", properties(&o.properties)),
        Expression::Arrow(a) => {
            let body = match &a.body {
                ArrowBody::Expression(e) => sexpr(e),
                ArrowBody::Block(b) => format!("{{{} statements}}", b.body.len()),
            };
            format!("(({}) => {})", properties(&a.params), body)
        }
        Expression::Conditional(c) => format!(
            "(if {} {} {})",
            sexpr(&c.test),
            sexpr(&c.consequent),
            sexpr(&c.alternate)
        ),
    }
}

fn properties(props: &[Property]) -> String {
    props
        .iter()
        .map(|p| match &p.value {
            Some(v) => format!("{}: {}", p.key.name, sexpr(v)),
            None => p.key.name.clone(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// Grammar through the replay fixture
// ============================================================================

#[test]
fn test_variable_declaration_from_replayed_tokens() {
    let program = replay(&[
        (TokenKind::Ident, "a"),
        (TokenKind::Assign, "="),
        (TokenKind::String, "\"hello\""),
    ]);
    assert_eq!(
        program.body,
        vec![Statement::Variable(VariableDeclaration {
            id: Identifier::new("a"),
            init: Expression::string("hello"),
        })]
    );
}

#[test]
fn test_division_from_replayed_tokens() {
    let program = replay(&[
        (TokenKind::Ident, "a"),
        (TokenKind::Div, "/"),
        (TokenKind::Int, "2"),
    ]);
    assert_eq!(
        program.body,
        vec![Statement::Expression(ExpressionStatement {
            expression: Expression::Binary(Box::new(BinaryExpression {
                operator: Operator::Division,
                left: Expression::identifier("a"),
                right: Expression::integer(2),
            })),
        })]
    );
}

#[test]
fn test_regex_operand_from_replayed_tokens() {
    let program = replay(&[
        (TokenKind::Ident, "r"),
        (TokenKind::RegexEq, "=~"),
        (TokenKind::Regex, "/^cpu/"),
    ]);
    let Statement::Expression(stmt) = &program.body[0] else {
        panic!("expected an expression statement");
    };
    assert_eq!(sexpr(&stmt.expression), "(=~ r /^cpu/)");
}

#[test]
fn test_comments_are_skipped_by_the_parser() {
    let program = replay(&[
        (TokenKind::Comment, "// first"),
        (TokenKind::Ident, "a"),
        (TokenKind::Comment, "// between"),
        (TokenKind::Assign, "="),
        (TokenKind::Int, "1"),
        (TokenKind::Comment, "// last"),
    ]);
    assert_eq!(program.body.len(), 1);
}

// ============================================================================
// Statements
// ============================================================================

#[test]
fn test_variable_declaration() {
    assert_eq!(
        program(r#"a = "hello""#).body,
        vec![Statement::Variable(VariableDeclaration {
            id: Identifier::new("a"),
            init: Expression::string("hello"),
        })]
    );
}

#[test]
fn test_option_statement() {
    let body = program(r#"option task = {name: "foo", every: 1h}"#).body;
    let Statement::Option(option) = &body[0] else {
        panic!("expected an option statement");
    };
    assert_eq!(option.declaration.id.name, "task");
    assert_eq!(sexpr(&option.declaration.init), r#"{name: "foo", every: 1h}"#);
}

#[test]
fn test_block_and_return() {
    let body = program("{\n  a = 1\n  return a\n}\nb").body;
    assert_eq!(
        body,
        vec![
            Statement::Block(BlockStatement {
                body: vec![
                    Statement::Variable(VariableDeclaration {
                        id: Identifier::new("a"),
                        init: Expression::integer(1),
                    }),
                    Statement::Return(ReturnStatement {
                        argument: Expression::identifier("a"),
                    }),
                ],
            }),
            Statement::Expression(ExpressionStatement {
                expression: Expression::identifier("b"),
            }),
        ]
    );
}

#[test]
fn test_statements_need_no_separators() {
    let body = program("a = 1 b = 2\nc = a + b").body;
    assert_eq!(body.len(), 3);
}

#[test]
fn test_empty_program() {
    assert!(program("").is_empty());
    assert!(program("  // only a comment\n").is_empty());
}

// ============================================================================
// Precedence
// ============================================================================

#[test]
fn test_precedence() {
    let test_cases = vec![
        ("a + b - c", "(- (+ a b) c)"),
        ("a * b / c % d", "(% (/ (* a b) c) d)"),
        ("1 + 2 * 3", "(* (+ 1 2) 3)"),
        ("1 * 2 + 3", "(* 1 (+ 2 3))"),
        ("a == b + 1", "(== a (+ b 1))"),
        ("a < b and c >= d", "(and (< a b) (>= c d))"),
        ("a or b and c", "(and (or a b) c)"),
        ("not a == b", "(== (not a) b)"),
        ("-a * b", "(* (- a) b)"),
        ("- -a", "(- (- a))"),
        ("exists r.host", "(exists r.host)"),
        ("a |> f() + 1", "(+ (|> a f()) 1)"),
        ("-a |> f()", "(|> (- a) f())"),
        ("a.b.c", "a.b.c"),
        ("f(x: 1).y[0]", "f(x: 1).y[0]"),
        ("(1 + 2) * 3", "(* (+ 1 2) 3)"),
        ("a / b", "(/ a b)"),
        ("r._value =~ /cpu[0-9]/", "(=~ r._value /cpu[0-9]/)"),
        ("r.host !~ /^web/ or r.x != 1", "(or (!~ r.host /^web/) (!= r.x 1))"),
    ];

    for (input, expected) in test_cases {
        assert_eq!(sexpr(&single_expression(input)), expected, "Failed for input: {}", input);
    }
}

// ============================================================================
// Pipes and calls
// ============================================================================

#[test]
fn test_nested_pipes() {
    let expected = Expression::Pipe(Box::new(PipeExpression {
        argument: Expression::Pipe(Box::new(PipeExpression {
            argument: Expression::Call(Box::new(call(Expression::identifier("from"), vec![]))),
            call: call(Expression::identifier("range"), vec![]),
        })),
        call: call(Expression::identifier("count"), vec![]),
    }));
    assert_eq!(single_expression("from() |> range() |> count()"), expected);
}

#[test]
fn test_query_pipeline() {
    let src = r#"
from(bucket: "telegraf/autogen")
    |> range(start: -1h)
    |> filter(fn: (r) => r._measurement == "cpu" and r._field == "usage_user")
    |> group(columns: ["host"])
"#;
    assert_eq!(
        sexpr(&single_expression(src)),
        r#"(|> (|> (|> from(bucket: "telegraf/autogen") range(start: (- 1h))) filter(fn: ((r) => (and (== r._measurement "cpu") (== r._field "usage_user"))))) group(columns: ["host"]))"#
    );
}

#[test]
fn test_call_arguments() {
    let test_cases = vec![
        ("f()", "f()"),
        ("f(a: 1)", "f(a: 1)"),
        ("f(a: 1, b: 2,)", "f(a: 1, b: 2)"),
        ("f(tables, n: 5)", "f(tables, n: 5)"),
        ("f(fn: (r) => r)", "f(fn: ((r) => r))"),
    ];

    for (input, expected) in test_cases {
        assert_eq!(sexpr(&single_expression(input)), expected, "Failed for input: {}", input);
    }
}

// ============================================================================
// Member and index access
// ============================================================================

#[test]
fn test_string_index_becomes_member_access() {
    let expr = single_expression(r#"a["b"]"#);
    assert_eq!(
        expr,
        Expression::Member(Box::new(MemberExpression {
            object: Expression::identifier("a"),
            property: PropertyKey::String(StringLiteral {
                value: "b".to_string()
            }),
        }))
    );
}

#[test]
fn test_computed_index() {
    let expr = single_expression("a[i + 1]");
    assert_eq!(
        expr,
        Expression::Index(Box::new(IndexExpression {
            array: Expression::identifier("a"),
            index: Expression::Binary(Box::new(BinaryExpression {
                operator: Operator::Addition,
                left: Expression::identifier("i"),
                right: Expression::integer(1),
            })),
        }))
    );
}

// ============================================================================
// Functions
// ============================================================================

#[test]
fn test_single_parameter_arrow() {
    assert_eq!(
        single_expression("(a) => a"),
        Expression::Arrow(Box::new(ArrowFunctionExpression {
            params: vec![Property::shorthand("a")],
            body: ArrowBody::Expression(Expression::identifier("a")),
        }))
    );
}

#[test]
fn test_parenthesized_identifier() {
    assert_eq!(single_expression("(a)"), Expression::identifier("a"));
}

#[test]
fn test_arrow_shapes() {
    let test_cases = vec![
        ("() => 1", "(() => 1)"),
        ("(a, b) => a + b", "((a, b) => (+ a b))"),
        ("(a, b,) => a", "((a, b) => a)"),
        ("(n=5) => n", "((n: 5) => n)"),
        ("(tables=<-, n=5) => tables", "((tables: <-, n: 5) => tables)"),
        ("(a, b=2) => a * b", "((a, b: 2) => (* a b))"),
        ("(r) => { return r }", "((r) => {1 statements})"),
        ("(a + b)", "(+ a b)"),
        ("(a.b)", "a.b"),
        ("(a == 1)", "(== a 1)"),
        ("(1)", "1"),
        ("((a))", "a"),
    ];

    for (input, expected) in test_cases {
        assert_eq!(sexpr(&single_expression(input)), expected, "Failed for input: {}", input);
    }
}

#[test]
fn test_function_declaration() {
    let body = program("top = (tables=<-, n) => tables |> sort() |> limit(n: n)").body;
    let Statement::Variable(decl) = &body[0] else {
        panic!("expected a declaration");
    };
    assert_eq!(
        sexpr(&decl.init),
        "((tables: <-, n) => (|> (|> tables sort()) limit(n: n)))"
    );
}

// ============================================================================
// Literals and compound values
// ============================================================================

#[test]
fn test_literals() {
    let test_cases = vec![
        ("42", "42"),
        ("1.5", "1.5"),
        (r#""a\tb""#, r#""a\tb""#),
        ("1h15m", "1h15m"),
        ("3µs", "3us"),
        ("/http:\\/\\//", "/http:///"),
        ("<-", "<-"),
        ("[]", "[]"),
        ("[1, 2, 3,]", "[1, 2, 3]"),
        ("{}", "{}"),
        ("{a, b: 1}", "{a, b: 1}"),
        ("if a then b else c", "(if a b c)"),
        ("if a > 1 then \"big\" else \"small\"", r#"(if (> a 1) "big" "small")"#),
    ];

    for (input, expected) in test_cases {
        let src = format!("x = {input}");
        let body = program(&src).body;
        let Statement::Variable(decl) = &body[0] else {
            panic!("expected a declaration for {input}");
        };
        assert_eq!(sexpr(&decl.init), expected, "Failed for input: {}", input);
    }
}

#[test]
fn test_date_time_values() {
    let test_cases = vec![
        ("2018-01-01", datetime!(2018-01-01 0:00 UTC)),
        ("2009-10-15T09:00:00", datetime!(2009-10-15 9:00 UTC)),
        ("2018-08-15T13:36:23-07:00", datetime!(2018-08-15 13:36:23 -7)),
    ];

    for (input, expected) in test_cases {
        match single_expression(input) {
            Expression::DateTime(lit) => assert_eq!(lit.value, expected, "Failed for input: {}", input),
            other => panic!("expected a date-time for {input}, got {other:?}"),
        }
    }
}

#[test]
fn test_duration_values() {
    assert_eq!(
        single_expression("1mo2w"),
        Expression::Duration(DurationLiteral {
            values: vec![
                Duration {
                    magnitude: 1,
                    unit: DurationUnit::Month
                },
                Duration {
                    magnitude: 2,
                    unit: DurationUnit::Week
                },
            ],
        })
    );
}

// ============================================================================
// Serialized tree
// ============================================================================

#[test]
fn test_json_shape() {
    let program = program("r = (r) => r._value > 10.5 |> f()");
    let json = serde_json::to_value(&program).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "body": [{
                "type": "VariableDeclaration",
                "id": {"name": "r"},
                "init": {
                    "type": "ArrowFunctionExpression",
                    "params": [{"key": {"name": "r"}}],
                    "body": {
                        "type": "BinaryExpression",
                        "operator": ">",
                        "left": {
                            "type": "MemberExpression",
                            "object": {"type": "Identifier", "name": "r"},
                            "property": {"name": "_value"}
                        },
                        "right": {
                            "type": "PipeExpression",
                            "argument": {"type": "FloatLiteral", "value": 10.5},
                            "call": {
                                "callee": {"type": "Identifier", "name": "f"},
                                "arguments": []
                            }
                        }
                    }
                }
            }]
        })
    );
}

#[test]
fn test_parser_accepts_borrowed_scanner() {
    let mut scanner = Scanner::new("a = 1\nb = a");
    let program = Parser::new(&mut scanner).parse_program().unwrap();
    assert_eq!(program.body.len(), 2);
    assert_eq!(scanner.line_count(), 2);
}
