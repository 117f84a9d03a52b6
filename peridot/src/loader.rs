//! Assembling a token stream into a document.

use hashlink::LinkedHashMap;

use peridot_parser::{Marker, ScanError, Token, TokenKind};

use crate::Yaml;

/// The synthetic key the document root hangs from. It gives the root the
/// same shape as any other pending mapping entry, so no state is special
/// cased.
const ROOT_KEY: &str = "root";

/// A slot a value lands in: a mapping entry or a sequence element.
///
/// Containers are held in arenas on the builder and referenced by index, so
/// slots stay small and the structures need no back references.
#[derive(Debug)]
enum Slot {
    /// A scalar, or `None` while no value has arrived yet.
    Value(Option<String>),
    /// Index of a nested mapping in [`DocumentBuilder::maps`].
    Mapping(usize),
    /// Index of a nested sequence in [`DocumentBuilder::seqs`].
    Sequence(usize),
}

/// What the builder expects next.
#[derive(Debug)]
enum BuildState {
    /// Filling a mapping; `key` is the entry awaiting its value.
    Mapping { node: usize, key: String, indent: i64 },
    /// A `-` was seen; the entry's value is awaited.
    SequenceValue { node: usize, indent: i64 },
    /// A sequence element is complete; the next `-` is awaited.
    SequenceEntry { node: usize, indent: i64 },
}

/// Builds a [`Yaml`] document from the tokens of a [`Scanner`].
///
/// Feed every token to [`DocumentBuilder::handle`] in order, then call
/// [`DocumentBuilder::into_document`]. Nesting is reconstructed from token
/// indentation alone: a token deeper than the current construct opens a
/// child, one at a known shallower indentation rejoins the construct
/// recorded there.
///
/// [`Scanner`]: peridot_parser::Scanner
#[derive(Debug)]
pub struct DocumentBuilder {
    maps: Vec<LinkedHashMap<String, Slot>>,
    seqs: Vec<Vec<Slot>>,
    /// Mapping arena index per indentation column, grow-only. An inner
    /// construct at the same column overwrites the outer one; entries are
    /// never popped, a stale entry is simply overwritten the next time the
    /// column is used.
    map_at_indent: Vec<Option<usize>>,
    /// Sequence arena index per indentation column, grow-only.
    seq_at_indent: Vec<Option<usize>>,
    state: BuildState,
}

impl DocumentBuilder {
    /// Create a builder for one document.
    #[must_use]
    pub fn new() -> Self {
        let mut root = LinkedHashMap::new();
        root.insert(ROOT_KEY.to_string(), Slot::Value(None));
        Self {
            maps: vec![root],
            seqs: vec![],
            map_at_indent: vec![],
            seq_at_indent: vec![],
            // The root key sits at a pseudo indentation every token is
            // deeper than.
            state: BuildState::Mapping {
                node: 0,
                key: ROOT_KEY.to_string(),
                indent: -1,
            },
        }
    }

    /// Feed one token to the builder.
    ///
    /// # Errors
    /// Returns a [`ScanError`] when the token cannot appear at its position
    /// in the document grammar.
    pub fn handle(&mut self, token: Token<'_>) -> Result<(), ScanError> {
        match token.kind {
            TokenKind::Comment(_) => Ok(()),
            TokenKind::Scalar { value, indent } => self.on_scalar(
                value.map(std::borrow::Cow::into_owned),
                signed(indent),
                token.mark,
            ),
            TokenKind::MappingKey { key, indent } => {
                self.on_key(key.into_owned(), signed(indent), token.mark)
            }
            TokenKind::SequenceEntry { indent } => self.on_entry(signed(indent), token.mark),
        }
    }

    fn on_scalar(
        &mut self,
        value: Option<String>,
        indent: i64,
        mark: Marker,
    ) -> Result<(), ScanError> {
        match &self.state {
            BuildState::Mapping {
                node,
                key,
                indent: own,
            } => {
                if indent <= *own {
                    // A scalar shallower than the pending entry belongs to
                    // nothing; the entry stays null.
                    return Ok(());
                }
                match self.maps[*node].get_mut(key.as_str()) {
                    Some(Slot::Value(pending)) => {
                        match pending {
                            None => *pending = value,
                            // A second scalar for the same entry is a
                            // continuation line; it joins with a space.
                            Some(existing) => {
                                if let Some(value) = value {
                                    existing.push(' ');
                                    existing.push_str(&value);
                                }
                            }
                        }
                        Ok(())
                    }
                    _ => Err(ScanError::new(
                        mark,
                        "Scalar value is not expected at this position",
                    )),
                }
            }
            BuildState::SequenceValue { node, indent: own } => {
                let (node, own) = (*node, *own);
                self.seqs[node].push(Slot::Value(value));
                self.state = BuildState::SequenceEntry { node, indent: own };
                Ok(())
            }
            BuildState::SequenceEntry { .. } => Err(ScanError::new(
                mark,
                "Scalar value is not expected at this position",
            )),
        }
    }

    fn on_key(&mut self, key: String, indent: i64, mark: Marker) -> Result<(), ScanError> {
        match &self.state {
            BuildState::Mapping {
                node,
                key: pending,
                indent: own,
            } => {
                if indent > *own {
                    let (node, pending) = (*node, pending.clone());
                    if !matches!(self.maps[node].get(&pending), Some(Slot::Value(None))) {
                        return Err(ScanError::new(
                            mark,
                            "Mapping key is not expected at this position",
                        ));
                    }
                    let child = self.new_mapping(&key);
                    self.maps[node].insert(pending, Slot::Mapping(child));
                    register(&mut self.map_at_indent, indent, child);
                    self.state = BuildState::Mapping {
                        node: child,
                        key,
                        indent,
                    };
                    Ok(())
                } else {
                    self.rejoin_mapping(key, indent, mark)
                }
            }
            BuildState::SequenceValue { node, indent: own } => {
                if indent > *own {
                    let node = *node;
                    let child = self.new_mapping(&key);
                    self.seqs[node].push(Slot::Mapping(child));
                    register(&mut self.map_at_indent, indent, child);
                    self.state = BuildState::Mapping {
                        node: child,
                        key,
                        indent,
                    };
                    Ok(())
                } else {
                    self.rejoin_mapping(key, indent, mark)
                }
            }
            BuildState::SequenceEntry { indent: own, .. } => {
                if indent > *own {
                    Err(ScanError::new(
                        mark,
                        "Mapping key is not expected at this position",
                    ))
                } else {
                    self.rejoin_mapping(key, indent, mark)
                }
            }
        }
    }

    fn on_entry(&mut self, indent: i64, mark: Marker) -> Result<(), ScanError> {
        match &self.state {
            BuildState::Mapping {
                node,
                key: pending,
                indent: own,
            } => {
                if indent > *own {
                    let (node, pending) = (*node, pending.clone());
                    if !matches!(self.maps[node].get(&pending), Some(Slot::Value(None))) {
                        return Err(ScanError::new(
                            mark,
                            "Sequence entry is not expected at this position",
                        ));
                    }
                    let child = self.new_sequence();
                    self.maps[node].insert(pending, Slot::Sequence(child));
                    register(&mut self.seq_at_indent, indent, child);
                    self.state = BuildState::SequenceValue {
                        node: child,
                        indent,
                    };
                    Ok(())
                } else if let Some(node) = lookup(&self.seq_at_indent, indent) {
                    self.state = BuildState::SequenceValue { node, indent };
                    Ok(())
                } else {
                    Err(ScanError::new(
                        mark,
                        "Sequence should not start at this position",
                    ))
                }
            }
            BuildState::SequenceValue { node, indent: own } => {
                if indent >= *own {
                    // `- - a`: the entry's value is itself a sequence.
                    let node = *node;
                    let child = self.new_sequence();
                    self.seqs[node].push(Slot::Sequence(child));
                    register(&mut self.seq_at_indent, indent, child);
                    self.state = BuildState::SequenceValue {
                        node: child,
                        indent,
                    };
                    Ok(())
                } else {
                    Err(ScanError::new(
                        mark,
                        "Sequence entry is not expected at this position",
                    ))
                }
            }
            BuildState::SequenceEntry { indent: own, .. } => {
                if indent > *own {
                    Err(ScanError::new(
                        mark,
                        "Sequence entry is not expected at this position",
                    ))
                } else if let Some(node) = lookup(&self.seq_at_indent, indent) {
                    self.state = BuildState::SequenceValue { node, indent };
                    Ok(())
                } else {
                    Ok(())
                }
            }
        }
    }

    fn rejoin_mapping(&mut self, key: String, indent: i64, mark: Marker) -> Result<(), ScanError> {
        let Some(node) = lookup(&self.map_at_indent, indent) else {
            return Err(ScanError::new(
                mark,
                "Mapping should not start at this position",
            ));
        };
        if self.maps[node].contains_key(&key) {
            return Err(ScanError::new(mark, "Duplicate mapping key"));
        }
        self.maps[node].insert(key.clone(), Slot::Value(None));
        self.state = BuildState::Mapping { node, key, indent };
        Ok(())
    }

    fn new_mapping(&mut self, key: &str) -> usize {
        let mut map = LinkedHashMap::new();
        map.insert(key.to_string(), Slot::Value(None));
        self.maps.push(map);
        self.maps.len() - 1
    }

    fn new_sequence(&mut self) -> usize {
        self.seqs.push(vec![]);
        self.seqs.len() - 1
    }

    /// Consume the builder and return the document. An input that produced
    /// no tokens yields [`Yaml::Null`].
    #[must_use]
    pub fn into_document(mut self) -> Yaml {
        let mut root = std::mem::take(&mut self.maps[0]);
        match root.remove(ROOT_KEY) {
            Some(slot) => self.build(slot),
            None => Yaml::Null,
        }
    }

    fn build(&mut self, slot: Slot) -> Yaml {
        match slot {
            Slot::Value(None) => Yaml::Null,
            Slot::Value(Some(scalar)) => Yaml::String(scalar),
            Slot::Mapping(node) => {
                let map = std::mem::take(&mut self.maps[node]);
                Yaml::Mapping(map.into_iter().map(|(k, v)| (k, self.build(v))).collect())
            }
            Slot::Sequence(node) => {
                let seq = std::mem::take(&mut self.seqs[node]);
                Yaml::Sequence(seq.into_iter().map(|v| self.build(v)).collect())
            }
        }
    }
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn signed(indent: usize) -> i64 {
    i64::try_from(indent).unwrap_or(i64::MAX)
}

fn register(table: &mut Vec<Option<usize>>, indent: i64, node: usize) {
    if let Ok(column) = usize::try_from(indent) {
        if table.len() <= column {
            table.resize(column + 1, None);
        }
        table[column] = Some(node);
    }
}

fn lookup(table: &[Option<usize>], indent: i64) -> Option<usize> {
    usize::try_from(indent)
        .ok()
        .and_then(|column| table.get(column).copied().flatten())
}
