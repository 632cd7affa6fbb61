//! Prompt and context-block formatting shared by standard and agentic
//! mode (`spec.md` §4.H "format the returned chunks as a context block
//! ... prefixed with its source file name and location").

use driveloom_search::ScoredChunk;

use crate::citation::CitationAccumulator;

/// The instruction common to both modes: cite sources with `[N]`
/// (`SPEC_FULL.md` §9 decision 3 — tool names are not echoed here, only
/// the citation contract).
pub fn base_instruction() -> &'static str {
    "You are a document assistant. Answer the user's question using only \
the provided context. Cite every claim drawn from the context using the \
syntax [N], where N is the number printed before the source chunk you \
relied on. If the context does not contain the answer, say so plainly."
}

pub fn standard_system_prompt() -> String {
    base_instruction().to_owned()
}

/// The agentic system prompt additionally describes the iteration
/// contract, without naming individual tools by name in prose
/// (`SPEC_FULL.md` §9 decision 3).
pub fn agentic_system_prompt(max_iterations: u32) -> String {
    format!(
        "{} You may call the tools made available to you to search the \
folder, inspect a file, or reformulate your query before answering. You \
have at most {max_iterations} tool-calling turns before you must answer \
with what you have.",
        base_instruction()
    )
}

/// Renders retrieved chunks into a single context block, numbering each
/// one with the marker the accumulator assigned it.
pub fn format_context_block(accumulator: &CitationAccumulator, chunks: &[ScoredChunk]) -> String {
    chunks
        .iter()
        .filter_map(|chunk| {
            let marker = accumulator.marker_for(chunk.chunk_id)?;
            Some(format!(
                "[{marker}] {} ({}):\n{}",
                chunk.file_name,
                chunk.location.label(),
                chunk.excerpt
            ))
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
