// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_function_comment(params: usize) -> String {
    let mut content = String::from(
        "Copies a range of elements. The copy is shallow.\n\nThe elements are copied in order.\n\n",
    );
    for i in 0..params {
        content.push_str(&format!(
            "\\param arg{i} Argument number {i}.\nIt is passed by `const&`.\n"
        ));
    }
    content.push_str(
        "\n\\requires The range is valid.\n\\effects Copies `std::vector<T>` elements.\n\\returns The copy.\n\\notes\nFirst note.\n\nSecond note.\n\\end\n\\see [std::copy]()\n",
    );
    content
}

#[allow(dead_code)]
pub fn generate_long_details(paragraphs: usize) -> String {
    let mut content = String::from("A brief sentence.\n\n");
    for i in 0..paragraphs {
        content.push_str(&format!(
            "Paragraph {i} with *emphasis*, `code` and a [link]() to <T>.\n\n- item\n- item\n\n"
        ));
    }
    content
}
