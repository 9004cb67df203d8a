use std::{cell::RefCell, error::Error, fs, io::Write, rc::Rc};

use night::Context;
use walkdir::WalkDir;

/// A writer that appends into a shared buffer, so a test can read back
/// what a program printed.
#[derive(Clone)]
struct Capture(Rc<RefCell<Vec<u8>>>);

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn run_night(src: &str) -> Result<String, Box<dyn Error>> {
    let buffer = Rc::new(RefCell::new(Vec::new()));
    let mut context = Context::with_output(Box::new(Capture(Rc::clone(&buffer))));

    night::run_source(src, "test.night", &mut context)?;

    let bytes = buffer.borrow().clone();
    Ok(String::from_utf8(bytes).expect("print output is valid utf-8"))
}

fn assert_output(src: &str, expected: &str) {
    match run_night(src) {
        Ok(output) => assert_eq!(output, expected, "program: {src}"),
        Err(e) => panic!("script failed: {e}\nprogram: {src}"),
    }
}

fn assert_error(src: &str, fragment: &str) {
    match run_night(src) {
        Ok(_) => panic!("script succeeded but was expected to fail: {src}"),
        Err(e) => {
            let message = e.to_string();
            assert!(message.contains(fragment),
                    "error {message:?} does not mention {fragment:?}\nprogram: {src}");
        },
    }
}

#[test]
fn demo_programs_work() {
    let mut count = 0;

    for entry in WalkDir::new("demos").into_iter()
                                      .filter_map(Result::ok)
                                      .filter(|e| {
                                          e.path().extension().is_some_and(|ext| ext == "night")
                                      })
    {
        let path = entry.path();
        let source =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("failed to read {path:?}: {e}"));

        count += 1;
        if let Err(e) = run_night(&source) {
            panic!("demo {path:?} failed: {e}");
        }
    }

    assert!(count > 0, "no demo programs found in demos/");
}

#[test]
fn declarations_and_arithmetic() {
    assert_output("let x int = 3; let y int = 4; print(x + y);", "7");
    assert_output("let x = 10 - 2 * 3; print(x);", "4");
    assert_output("print((1 + 2) * 4);", "12");
    assert_output("print(7 % 3);", "1");
    assert_output("print(1 + 2.5);", "3.5");
    assert_output("print(2.5 * 2);", "5");
    assert_output("print(-5);", "-5");
    assert_output("print(7 / 2);", "3");
}

#[test]
fn typed_declarations_take_defaults() {
    assert_output("let b bool; print(b);", "false");
    assert_output("let n int; print(n);", "0");
    assert_output("let s str; print(s + \"!\");", "!");
    assert_output("let xs int[3]; print(xs);", "[ 0, 0, 0 ]");
    assert_output("let grid int[2][2]; print(grid);", "[ [ 0, 0 ], [ 0, 0 ] ]");
    assert_output("let xs int[]; print(xs.len());", "0");
}

#[test]
fn strings_concatenate_and_measure() {
    assert_output("let s str = \"abc\"; s += \"de\"; print(s); print(s.len());", "abcde5");
    assert_output("print(\"a\" + \"b\");", "ab");
    assert_output("print(\"night\"[2]);", "g");
    assert_error("let s str = \"a\"; s += 1;",
                 "type 'str' can only be concatenated with type 'str'");
    assert_error("print(\"a\" + 1);", "concatenated");
}

#[test]
fn string_escapes_resolve() {
    assert_output("print(\"a\\tb\\n\");", "a\tb\n");
    assert_output("print(\"say \\\"hi\\\"\");", "say \"hi\"");
}

#[test]
fn arrays_push_pop_and_index() {
    assert_output("let a = [1, 2, 3]; a.push(4); a[0] = 9; print(a);", "[ 9, 2, 3, 4 ]");
    assert_output("let a = [1, 2]; a.push(9, 1); print(a);", "[ 1, 9, 2 ]");
    assert_output("let a = [1, 2, 3]; a.pop(); print(a);", "[ 1, 2 ]");
    assert_output("let a = [1, 2, 3]; a.pop(0); print(a);", "[ 2, 3 ]");
    assert_output("let a = [1, 2, 3]; print(a.len());", "3");
    assert_output("let a = []; print(a);", "[ ]");
    assert_output("let m = [[1, 2], [3, 4]]; m[1][0] = 9; print(m);",
                  "[ [ 1, 2 ], [ 9, 4 ] ]");
    assert_output("let a = [1, \"two\", true]; print(a);", "[ 1, two, true ]");
}

#[test]
fn push_then_pop_is_identity() {
    assert_output("let a = [1, 2]; a.push(3); a.pop(); print(a);", "[ 1, 2 ]");
}

#[test]
fn array_boundaries_are_errors() {
    assert_error("let a = [1]; print(a[1]);", "out of range");
    assert_error("let a = [1]; print(a[-1]);", "negative");
    assert_error("let a = []; print(a[0]);", "out of range");
    assert_error("print(\"\"[0]);", "out of range");
    assert_error("let a = [1]; a[true] = 1;", "type 'int'");
    assert_error("let a = []; a.pop();", "empty array");
    assert_error("let a = [1]; a.push(9, 5);", "out of range");
    assert_error("let x = 1; print(x[0]);",
                 "subscript operator can only be used on types 'str' or 'arr'");
}

#[test]
fn string_element_assignment() {
    assert_output("let s str = \"abc\"; s[1] = \"z\"; print(s);", "azc");
    assert_error("let s str = \"abc\"; s[1] = \"zz\";",
                 "characters can only be assigned to other characters");
    assert_error("let s str = \"abc\"; s[9] = \"z\";", "out of range");
}

#[test]
fn division_by_zero_is_an_error() {
    assert_error("print(1 / 0);", "division by zero");
    assert_error("print(1 % 0);", "division by zero");
    assert_error("let x = 5; x /= 0;", "division by zero");
}

#[test]
fn equality_is_structural_and_typed() {
    assert_output("print([1, 2] == [1, 2]);", "true");
    assert_output("print([1, 2] != [2, 1]);", "true");
    assert_output("print(\"a\" == \"a\");", "true");
    assert_output("let x = 3; print(x == x);", "true");
    assert_output("let a = [1, [2, 3]]; print(a == a && !(a != a));", "true");
    assert_error("print(1 == 1.5);", "same type");
    assert_error("print(1 == true);", "same type");
}

#[test]
fn comparisons_promote_numerics() {
    assert_output("print(1 < 1.5);", "true");
    assert_output("print(2 >= 2);", "true");
    assert_error("print(\"a\" < \"b\");", "'int' or 'float'");
}

#[test]
fn logic_short_circuits() {
    assert_output("print(false && 1 / 0 == 0);", "false");
    assert_output("print(true || 1 / 0 == 0);", "true");
    assert_output("print(true && false);", "false");
    assert_error("print(1 && true);", "type 'bool'");
}

#[test]
fn conditionals_chain() {
    assert_output("if (true) { print(1); }", "1");
    assert_output("if (false) { print(1); } else { print(2); }", "2");
    assert_output("let x = 5; if (x < 3) { print(\"lo\"); } elif (x < 7) { print(\"mid\"); } \
                   else { print(\"hi\");  }",
                  "mid");
    assert_output("if (false) print(1); elif (false) print(2);", "");
    assert_error("print(1); elif (true) { print(2); }", "'elif' statement must come after");
    assert_error("else { print(2); }", "'else' statement must come after");
    assert_error("if (1) { print(1); }", "condition must be type 'bool'");
}

#[test]
fn loops_cover_all_section_kinds() {
    assert_output("let xs = [0, 0, 0]; loop (i : 0..3) { xs[i] = i * i; } print(xs);",
                  "[ 0, 1, 4 ]");
    assert_output("let count = 3; loop (count > 0) { count -= 1; } print(count);", "0");
    assert_output("let acc = 1; loop (i = 1, i <= 5) { acc *= i; i += 1; } print(acc);", "120");
    assert_output("loop (c : \"hi\") { print(c); }", "hi");
    assert_output("let total = 0; loop (x : [1, 2, 3]) { total += x; } print(total);", "6");
    assert_error("loop (x : 5) { print(x); }", "loop range must be type 'str', 'arr', or 'rng'");
}

#[test]
fn loop_init_overwrites_outer_bindings() {
    assert_output("let i = 99; loop (i = 0, i < 3) { i += 1; } print(i);", "3");
}

#[test]
fn ranges_iterate_both_directions() {
    assert_output("loop (i : 0..3) { print(i); }", "012");
    assert_output("loop (i : 3..0) { print(i); }", "210");
    assert_output("loop (i : 2..2) { print(i); } print(\"done\");", "done");
}

#[test]
fn ranges_expand_inside_array_literals() {
    assert_output("print([1, 2..5, 9]);", "[ 1, 2, 3, 4, 9 ]");
    assert_output("print([5, 5..2, 9]);", "[ 5, 4, 3, 2, 9 ]");
    assert_output("print([0..0]);", "[ ]");
}

#[test]
fn ranges_may_not_escape() {
    assert_error("let r = 0..3;", "range");
    assert_error("print(0..3);", "range");
    assert_error("fn f() int { return 0..3; } f();", "range");
}

#[test]
fn functions_call_and_recurse() {
    assert_output("fn fact(n int) int { if (n <= 1) { return 1; } return n * fact(n - 1); } \
                   print(fact(5));",
                  "120");
    assert_output("fn add(a int, b int) int { return a + b; } print(add(2, 5));", "7");
    assert_output("fn greet() { print(\"hey\"); } greet();", "hey");
    assert_output("fn fib(n int) int { if (n <= 1) { return n; } return fib(n - 1) + fib(n - 2); } \
                   print(fib(10));",
                  "55");
}

#[test]
fn recursion_limit_holds() {
    assert_error("fn r(n int) int { return r(n + 1); } r(0);",
                 "exceeds the recursion limit of 1000");
}

#[test]
fn call_arity_and_returns_are_checked() {
    assert_error("fn add(a int, b int) int { return a + b; } print(add(1));", "argument");
    assert_error("fn p() { return; } let x = p();", "does not return a value");
    assert_error("fn p() { print(\"\"); } let x = p();", "does not return a value");
}

#[test]
fn parser_rejects_undeclared_names() {
    assert_error("print(x);", "has not been declared");
    assert_error("x = 1;", "has not been declared");
    assert_error("missing();", "has not been defined");
    assert_error("fn a() { b(); }", "has not been defined");
    assert_error("if (true) { let t = 1; } print(t);", "has not been declared");
}

#[test]
fn parser_rejects_builtin_redefinition() {
    assert_error("fn print(x int) int { return x; }", "builtin");
}

#[test]
fn function_redefinition_is_not_an_error() {
    assert_output("fn f() int { return 1; } fn f() int { return 2; } print(f());", "2");
}

#[test]
fn lexer_reports_bad_input() {
    assert_error("let s = \"abc;", "closing quotes");
    assert_error("let x = 'a';", "unknown symbol");
    assert_error("let x = 'a';", "double quotations");
    assert_error("let x = 1 @ 2;", "unknown symbol");
}

#[test]
fn conversions_follow_their_names() {
    assert_output("print(int(\"42\") + 1);", "43");
    assert_output("print(int(3.9));", "3");
    assert_output("print(int(true));", "1");
    assert_output("print(float(3));", "3");
    assert_output("print(float(\"2.5\") * 2.0);", "5");
    assert_output("print(str(5) + \"!\");", "5!");
    assert_output("print(str(true));", "true");
    assert_output("print(str(1.5));", "1.5");
    assert_error("print(int(\"abc\"));", "cannot be converted");
    assert_error("print(str([1]));", "cannot be converted into type 'str'");
    assert_error("print(int([1]));", "argument can only be types");
}

#[test]
fn assignment_is_idempotent_and_scoped() {
    assert_output("let x = 5; x = 5; x = 5; print(x);", "5");
    assert_output("let x = 1; if (true) { x = 2; } print(x);", "2");
    assert_output("let x = 1; fn bump() { print(x); } bump();", "1");
}

#[test]
fn statements_end_at_newlines_too() {
    assert_output("let x = 1\nlet y = 2\nprint(x + y)", "3");
    assert_output("# a comment line\nprint(1) # trailing comment", "1");
}

#[test]
fn value_copies_do_not_alias() {
    assert_output("let a = [1, 2]; let b = a; b[0] = 9; print(a); print(b);",
                  "[ 1, 2 ][ 9, 2 ]");
    assert_output("let a = [1]; fn take(xs int) { } take(a); print(a);", "[ 1 ]");
}

#[test]
fn print_and_str_agree_on_scalars() {
    for (expr, text) in [("true", "true"), ("false", "false"), ("12", "12"), ("1.5", "1.5"),
                         ("\"night\"", "night")]
    {
        assert_output(&format!("print({expr});"), text);
        assert_output(&format!("print(str({expr}));"), text);
    }
}
