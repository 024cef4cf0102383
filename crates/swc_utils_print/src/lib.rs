use swc_common::comments::{Comments, SingleThreadedComments};
use swc_common::sync::Lrc;
use swc_common::SourceMap;
pub use swc_compiler_base::PrintArgs;
use swc_ecma_ast::Program;

/// Prints a program back to source text.
///
/// Panics if the emitter fails, which only happens on I/O errors writing to
/// an in-memory buffer.
pub fn program_to_str(cm: &Lrc<SourceMap>, program: &Program, print_args: PrintArgs<'_>) -> String {
    match swc_compiler_base::print(cm.clone(), program, print_args) {
        Ok(output) => output.code,
        Err(err) => panic!("failed to print program: {err:?}"),
    }
}

/// Round-trips `src` through the parser and printer, so that two sources can
/// be compared independently of formatting.
///
/// `filename` selects the parser syntax (`.jsx`, `.tsx`, ...).
pub fn normalise_src(filename: &str, src: &str, print_args: PrintArgs) -> String {
    let mut pargs = print_args;

    // Backup value for comments in case it is not provided, declared at the
    // function level so it outlives the borrow in `pargs`.
    let own_comments: Option<SingleThreadedComments>;
    if pargs.comments.is_none() {
        own_comments = Some(SingleThreadedComments::default());
        pargs.comments = own_comments.as_ref().map(|c| c as &dyn Comments);
    }

    let parsed = swc_utils_parse::try_parse_ecma_src_comments(filename, src, pargs.comments);
    match parsed {
        Ok((cm, program)) => program_to_str(&cm, &program, pargs),
        Err(err) => panic!("{}", err),
    }
}
