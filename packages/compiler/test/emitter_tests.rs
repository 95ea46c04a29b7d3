mod common;

use common::{source, span};
use plasma_compiler::output::{Chunk, EmitterContext};

#[test]
fn renders_indented_blocks() {
    let mut chunk = Chunk::text("function f() {");
    chunk
        .indent()
        .newline()
        .push_text("return 1;")
        .dedent()
        .newline()
        .push_text("}");

    let mut emitter = EmitterContext::new("  ");
    emitter.print_chunk(&chunk);
    assert_eq!(emitter.to_source(), "function f() {\n  return 1;\n}");
}

#[test]
fn respects_custom_indent_strings() {
    let mut chunk = Chunk::text("a {");
    chunk.indent().newline().push_text("b;").dedent().newline().push_text("}");

    let mut emitter = EmitterContext::new("\t");
    emitter.print_chunk(&chunk);
    assert_eq!(emitter.to_source(), "a {\n\tb;\n}");
}

#[test]
fn blank_lines_carry_no_indentation() {
    let mut chunk = Chunk::text("a {");
    chunk
        .indent()
        .newline()
        .newline()
        .push_text("b;")
        .dedent()
        .newline()
        .push_text("}");

    let mut emitter = EmitterContext::new("  ");
    emitter.print_chunk(&chunk);
    assert_eq!(emitter.to_source(), "a {\n\n  b;\n}");
}

#[test]
fn nested_indent_levels_accumulate() {
    let mut chunk = Chunk::text("a {");
    chunk.indent().newline().push_text("b {");
    chunk.indent().newline().push_text("c;");
    chunk.dedent().newline().push_text("}");
    chunk.dedent().newline().push_text("}");

    let mut emitter = EmitterContext::new("  ");
    emitter.print_chunk(&chunk);
    assert_eq!(emitter.to_source(), "a {\n  b {\n    c;\n  }\n}");
}

#[test]
fn println_without_text_ends_the_line() {
    let mut emitter = EmitterContext::new("  ");
    emitter.println(None, "a");
    emitter.println(None, "");
    emitter.println(None, "b");
    assert_eq!(emitter.to_source(), "a\n\nb\n");
}

#[test]
fn maps_spanned_parts_to_their_source() {
    let file = source("<div>hello</div>");
    let sp = span(&file, 5, 10);

    let mut chunk = Chunk::text("text(");
    chunk.push_spanned("'hello'", &sp);
    chunk.push_text(");");

    let mut emitter = EmitterContext::new("  ");
    emitter.print_chunk(&chunk);
    emitter.println(None, "");

    let json = emitter
        .to_source_map_generator("template.html.js")
        .to_json()
        .unwrap();

    // The generated file itself is registered so the leading unspanned text
    // maps somewhere; sources come out sorted.
    assert_eq!(
        json.sources,
        vec!["template.html".to_string(), "template.html.js".to_string()]
    );
    assert_eq!(
        json.sources_content,
        vec![
            Some("<div>hello</div>".to_string()),
            Some(" ".to_string())
        ]
    );
    assert_eq!(json.mappings, "ACAA,KDAK");
}

#[test]
fn leading_spanned_part_maps_without_synthetic_segment() {
    let file = source("<div>hello</div>");
    let sp = span(&file, 5, 10);

    let mut emitter = EmitterContext::new("  ");
    emitter.print_chunk(&Chunk::spanned("hello", &sp));
    emitter.println(None, "");

    let json = emitter
        .to_source_map_generator("template.html.js")
        .to_json()
        .unwrap();
    assert_eq!(json.sources, vec!["template.html".to_string()]);
    assert_eq!(json.mappings, "AAAK");
}

#[test]
fn identical_adjacent_spans_coalesce_into_one_segment() {
    let file = source("<div>hello</div>");
    let sp = span(&file, 5, 10);

    let mut chunk = Chunk::spanned("hel", &sp);
    chunk.push_spanned("lo", &sp);

    let mut emitter = EmitterContext::new("  ");
    emitter.print_chunk(&chunk);
    emitter.println(None, "");

    let json = emitter
        .to_source_map_generator("template.html.js")
        .to_json()
        .unwrap();
    assert_eq!(json.mappings, "AAAK");
}

#[test]
fn unspanned_output_maps_only_to_the_generated_file() {
    let mut emitter = EmitterContext::new("  ");
    emitter.println(None, "const a = 1;");

    let json = emitter.to_source_map_generator("out.js").to_json().unwrap();
    assert_eq!(json.sources, vec!["out.js".to_string()]);
    assert_eq!(json.mappings, "AAAA");
}

#[test]
fn trailing_empty_line_is_not_mapped() {
    let file = source("x");
    let sp = span(&file, 0, 1);

    let mut emitter = EmitterContext::new("  ");
    emitter.print_chunk(&Chunk::spanned("x", &sp));
    emitter.println(None, "");

    let json = emitter.to_source_map_generator("out.js").to_json().unwrap();
    assert!(!json.mappings.contains(';'));
}
