//! Tab completion driven by live introspection.
//!
//! Candidates are always computed from a fresh round trip, never from a
//! cache, so they reflect what the bus offers right now. Failures produce no
//! candidates rather than errors.

use crate::navigation::{resolve_path, NavigationContext};

/// What a command's arguments complete to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionKind {
    /// Well-known bus names.
    Services,
    /// Child objects of the path the arguments resolve to.
    Children,
    /// Interfaces at the current path.
    Interfaces,
    /// Properties of the selected interface.
    Properties,
    /// Methods of the selected interface.
    Methods,
}

/// All candidates for `kind`, given the command arguments typed so far.
pub fn candidates<S: AsRef<str>>(
    ctx: &NavigationContext,
    kind: CompletionKind,
    args: &[S],
) -> Vec<String> {
    match kind {
        CompletionKind::Services => ctx.list_services().unwrap_or_default(),
        CompletionKind::Children => children(ctx, args),
        CompletionKind::Interfaces => ctx
            .describe()
            .map(|desc| desc.interface_names())
            .unwrap_or_default(),
        CompletionKind::Properties => ctx
            .selected_interface()
            .map(|ifc| ifc.properties.into_iter().map(|p| p.name).collect())
            .unwrap_or_default(),
        CompletionKind::Methods => ctx
            .selected_interface()
            .map(|ifc| ifc.methods.into_iter().map(|m| m.name).collect())
            .unwrap_or_default(),
    }
}

fn children<S: AsRef<str>>(ctx: &NavigationContext, args: &[S]) -> Vec<String> {
    let Ok(path) = resolve_path(ctx.path(), ctx.previous_path(), ctx.service(), args) else {
        return Vec::new();
    };
    ctx.fetch(&path)
        .map(|desc| desc.children)
        .unwrap_or_default()
}

/// Replacements for the word being typed.
///
/// `prior` holds the complete arguments before `word`. For [`CompletionKind::Children`]
/// a `word` containing `/` completes the segment after its last slash, so
/// `cd foo/b<TAB>` offers `foo/bar`.
pub fn complete_word(
    ctx: &NavigationContext,
    kind: CompletionKind,
    prior: &[&str],
    word: &str,
) -> Vec<String> {
    let (dir, prefix) = match (kind, word.rfind('/')) {
        (CompletionKind::Children, Some(idx)) => word.split_at(idx + 1),
        _ => ("", word),
    };

    let mut args: Vec<&str> = prior.to_vec();
    if !dir.is_empty() {
        args.push(dir);
    }

    let mut matches: Vec<String> = candidates(ctx, kind, &args)
        .into_iter()
        .filter(|candidate| candidate.starts_with(prefix))
        .map(|candidate| format!("{}{}", dir, candidate))
        .collect();
    matches.sort();
    matches.dedup();
    matches
}
