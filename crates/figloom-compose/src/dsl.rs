//! Composition-key expansion and token classification
//!
//! User-supplied keys are macro-expanded against the composition map by
//! splice-replacing at a cursor until every position holds a terminal. Each
//! terminal then classifies into an action keyed by the node name it
//! addresses; later tokens overwrite earlier ones.

use figloom_core::{FigloomError, Result};
use figloom_unity::CompositionEntry;
use std::collections::HashMap;

/// What a terminal token does to the node it names
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// `Name+` or bare `Name`: draw the node
    Include,
    /// `Name-`: drop the node and its whole subtree
    Exclude,
    /// `Name>Child`: among the node's children keep only `Child`
    SelectChild(String),
}

/// Node name to action, produced from one expanded key list
#[derive(Debug, Default)]
pub struct ActionTable {
    actions: HashMap<String, Action>,
}

impl ActionTable {
    /// Expand the user's keys and classify every terminal.
    pub fn from_keys(map: &[CompositionEntry], keys: &[String]) -> Result<Self> {
        let terminals = expand_keys(map, keys)?;
        let mut actions = HashMap::new();
        for token in &terminals {
            let (name, action) = classify_token(token)?;
            actions.insert(name, action);
        }
        Ok(Self { actions })
    }

    pub fn get(&self, name: &str) -> Option<&Action> {
        self.actions.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Action)> {
        self.actions.iter().map(|(name, action)| (name.as_str(), action))
    }
}

/// Expand macros until every list position holds a terminal.
///
/// A token is a macro when it appears verbatim as a key in the map; sigiled
/// tokens are always terminals. The macro reference graph is checked for
/// cycles upfront so expansion is guaranteed to finish.
pub fn expand_keys(map: &[CompositionEntry], keys: &[String]) -> Result<Vec<String>> {
    let macros: HashMap<&str, &str> = map
        .iter()
        .filter(|entry| !entry.key.is_empty())
        .map(|entry| (entry.key.as_str(), entry.composition.as_str()))
        .collect();

    check_cycles(&macros, keys)?;

    let mut list: Vec<String> = keys.to_vec();
    let mut index = 0;
    while index < list.len() {
        match macros.get(list[index].as_str()) {
            None => index += 1,
            Some(composition) => {
                let tokens = composition.split(',').map(str::to_string);
                list.splice(index..=index, tokens);
            }
        }
    }
    Ok(list)
}

/// Reject macro cycles reachable from the evaluated keys; the splice loop
/// would otherwise grow the list forever.
fn check_cycles(macros: &HashMap<&str, &str>, keys: &[String]) -> Result<()> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        Visiting,
        Done,
    }

    fn visit<'a>(
        key: &'a str,
        macros: &HashMap<&'a str, &'a str>,
        marks: &mut HashMap<&'a str, Mark>,
    ) -> Result<()> {
        match marks.get(key) {
            Some(Mark::Done) => return Ok(()),
            Some(Mark::Visiting) => {
                return Err(FigloomError::CyclicComposition(key.to_string()));
            }
            None => {}
        }
        marks.insert(key, Mark::Visiting);
        if let Some(composition) = macros.get(key) {
            for token in composition.split(',') {
                if macros.contains_key(token) {
                    visit(token, macros, marks)?;
                }
            }
        }
        marks.insert(key, Mark::Done);
        Ok(())
    }

    let mut marks = HashMap::new();
    for key in keys {
        if let Some((&key, _)) = macros.get_key_value(key.as_str()) {
            visit(key, macros, &mut marks)?;
        }
    }
    Ok(())
}

/// Classify one terminal into `(node name, action)`.
///
/// The name reduces to its last `/` path segment. A `+` in the middle of a
/// token reinterprets it as a path (`a/b/foo+bar` means `a/b/foo/bar`); a
/// `-` anywhere but the end is malformed.
pub fn classify_token(token: &str) -> Result<(String, Action)> {
    let (key, action) = if token.contains('>') {
        let mut parts = token.split('>');
        let key = parts.next().unwrap_or_default().to_string();
        let child = parts.next().unwrap_or_default().to_string();
        (key, Action::SelectChild(child))
    } else if token.contains('+') {
        match token.strip_suffix('+') {
            Some(key) => (key.to_string(), Action::Include),
            None => (token.replace('+', "/"), Action::Include),
        }
    } else if token.contains('-') {
        let key = token.strip_suffix('-').ok_or_else(|| {
            FigloomError::Composition(format!(
                "exclude sigil must be trailing in token '{token}'"
            ))
        })?;
        (key.to_string(), Action::Exclude)
    } else {
        log::warn!("composition token '{token}' has no action sigil, defaulting to include");
        (token.to_string(), Action::Include)
    };

    let name = key.rsplit('/').next().unwrap_or_default().to_string();
    if name.is_empty() {
        return Err(FigloomError::Composition(format!(
            "empty node name parsed from token '{token}'"
        )));
    }
    Ok((name, action))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(key: &str, composition: &str) -> CompositionEntry {
        CompositionEntry {
            key: key.to_string(),
            composition: composition.to_string(),
        }
    }

    fn keys(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_macro_expansion() {
        let map = vec![entry("A", "B,C"), entry("B", "X+,Y-")];
        let terminals = expand_keys(&map, &keys(&["A", "C"])).unwrap();
        assert_eq!(terminals, vec!["X+", "Y-", "C", "C"]);
    }

    #[test]
    fn test_expansion_keeps_order_and_reexpands_in_place() {
        let map = vec![entry("A", "B,Z"), entry("B", "C"), entry("C", "leaf+")];
        let terminals = expand_keys(&map, &keys(&["A"])).unwrap();
        assert_eq!(terminals, vec!["leaf+", "Z"]);
    }

    #[test]
    fn test_sigiled_token_is_terminal_even_if_key_exists() {
        // "B+" carries a sigil, so it never matches the macro key "B".
        let map = vec![entry("A", "B+"), entry("B", "X")];
        let terminals = expand_keys(&map, &keys(&["A"])).unwrap();
        assert_eq!(terminals, vec!["B+"]);
    }

    #[test]
    fn test_cycle_detected() {
        let map = vec![entry("A", "B"), entry("B", "A")];
        assert!(matches!(
            expand_keys(&map, &keys(&["A"])),
            Err(FigloomError::CyclicComposition(_))
        ));

        let map = vec![entry("A", "X,A")];
        assert!(matches!(
            expand_keys(&map, &keys(&["A"])),
            Err(FigloomError::CyclicComposition(_))
        ));

        // A cycle the evaluated keys never reach does not block the run.
        assert_eq!(expand_keys(&map, &keys(&["X"])).unwrap(), vec!["X"]);
    }

    #[test]
    fn test_classify_actions() {
        assert_eq!(
            classify_token("Body+").unwrap(),
            ("Body".to_string(), Action::Include)
        );
        assert_eq!(
            classify_token("Blush-").unwrap(),
            ("Blush".to_string(), Action::Exclude)
        );
        assert_eq!(
            classify_token("Eyes>Wink").unwrap(),
            ("Eyes".to_string(), Action::SelectChild("Wink".to_string()))
        );
        // Bare token: implicit include with a warning.
        assert_eq!(
            classify_token("Face").unwrap(),
            ("Face".to_string(), Action::Include)
        );
    }

    #[test]
    fn test_classify_paths() {
        // Explicit include under a path keeps only the last segment.
        assert_eq!(
            classify_token("Body/Arm+").unwrap(),
            ("Arm".to_string(), Action::Include)
        );
        // A middle '+' reinterprets the token as a path.
        assert_eq!(
            classify_token("a/b/foo+bar").unwrap(),
            ("bar".to_string(), Action::Include)
        );
        // Exclusive select under a path.
        assert_eq!(
            classify_token("Face/Eyes>Open").unwrap(),
            ("Eyes".to_string(), Action::SelectChild("Open".to_string()))
        );
    }

    #[test]
    fn test_mid_exclude_sigil_fails() {
        assert!(classify_token("a-b").is_err());
    }

    #[test]
    fn test_empty_name_fails() {
        assert!(classify_token("+").is_err());
    }

    #[test]
    fn test_action_table_later_tokens_win() {
        let map = vec![entry("A", "X+,X-")];
        let table = ActionTable::from_keys(&map, &keys(&["A"])).unwrap();
        assert_eq!(table.get("X"), Some(&Action::Exclude));
    }

    #[test]
    fn test_action_table_from_nested_macros() {
        let map = vec![entry("A", "B,C"), entry("B", "X+,Y-")];
        let table = ActionTable::from_keys(&map, &keys(&["A", "C"])).unwrap();
        assert_eq!(table.get("X"), Some(&Action::Include));
        assert_eq!(table.get("Y"), Some(&Action::Exclude));
        assert_eq!(table.get("C"), Some(&Action::Include));
    }
}
