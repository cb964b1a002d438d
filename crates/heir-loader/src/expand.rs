//! `${...}` property expansion.
//!
//! The only supported property is `${random-word}`, which is replaced by a
//! generated lowercase word pair so that, for example, hostnames stay unique
//! across pushes. Any other well-formed `${name}` reference is an error.

use rand::seq::SliceRandom;

use crate::yaml::Node;

const RANDOM_WORD: &str = "random-word";

const ADJECTIVES: &[&str] = &[
    "agile", "bold", "brave", "calm", "clever", "daring", "eager", "fancy", "gentle", "happy",
    "jolly", "keen", "lively", "lucky", "merry", "nimble", "proud", "quick", "quiet", "rapid",
    "shiny", "silly", "sleek", "sunny", "swift", "tidy", "vivid", "wise", "witty", "zesty",
];

const NOUNS: &[&str] = &[
    "badger", "beaver", "bison", "camel", "cheetah", "dolphin", "eagle", "falcon", "gecko",
    "hare", "heron", "ibis", "jackal", "koala", "lemur", "lynx", "marmot", "otter", "panda",
    "puffin", "quokka", "raven", "seal", "tapir", "toucan", "turtle", "walrus", "wombat", "yak",
    "zebra",
];

/// Source of words for `${random-word}`.
pub trait WordSource: Send + Sync {
    /// Produce one lowercase word (may contain `-`).
    fn word(&self) -> String;
}

/// `rand`-backed adjective-noun generator.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomWords;

impl WordSource for RandomWords {
    fn word(&self) -> String {
        let mut rng = rand::thread_rng();
        let adjective = ADJECTIVES.choose(&mut rng).copied().unwrap_or("quick");
        let noun = NOUNS.choose(&mut rng).copied().unwrap_or("otter");
        format!("{adjective}-{noun}")
    }
}

/// Always returns the same word. Useful for deterministic output.
#[derive(Clone, Debug)]
pub struct FixedWord(pub String);

impl WordSource for FixedWord {
    fn word(&self) -> String {
        self.0.to_lowercase()
    }
}

/// Expand properties in every string of `node`, recursively.
///
/// Mapping keys are left untouched. On failure the unsupported property
/// (e.g. `${domain}`) is returned.
pub fn expand_properties(node: Node, words: &dyn WordSource) -> Result<Node, String> {
    match node {
        Node::Str(s) => expand_string(&s, words).map(Node::Str),
        Node::Seq(items) => items
            .into_iter()
            .map(|item| expand_properties(item, words))
            .collect::<Result<Vec<_>, _>>()
            .map(Node::Seq),
        Node::Map(entries) => entries
            .into_iter()
            .map(|(k, v)| expand_properties(v, words).map(|v| (k, v)))
            .collect::<Result<Vec<_>, _>>()
            .map(Node::Map),
        other => Ok(other),
    }
}

/// Expand one string. All `${random-word}` occurrences in a single string
/// share one generated word.
fn expand_string(input: &str, words: &dyn WordSource) -> Result<String, String> {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    let mut word: Option<String> = None;

    while let Some(start) = rest.find("${") {
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            break;
        };
        let name = &after[..end];
        out.push_str(&rest[..start]);

        if !is_property_name(name) {
            // Not a property reference, keep it literally.
            out.push_str(&rest[start..start + 2 + end + 1]);
        } else if name == RANDOM_WORD {
            let w = word.get_or_insert_with(|| words.word().to_lowercase());
            out.push_str(w);
        } else {
            return Err(format!("${{{name}}}"));
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    Ok(out)
}

fn is_property_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}
