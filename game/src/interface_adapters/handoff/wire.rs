use crate::domain::world::RemotePlayer;
use crate::domain::{Position, SyncSnapshot};

pub fn move_line(at: Position) -> String {
    format!("MOVE {} {}\n", at.x, at.y)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Header,
    Map { remaining: usize },
    Players { remaining: usize },
}

/// Line-by-line parser for state blocks (`SELF`, `MAP`, `PLAYERS`, `END`).
#[derive(Debug)]
pub struct SnapshotParser {
    section: Section,
    current: SyncSnapshot,
}

impl Default for SnapshotParser {
    fn default() -> Self {
        Self {
            section: Section::Header,
            current: SyncSnapshot::default(),
        }
    }
}

impl SnapshotParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one line without its newline. Returns the snapshot once `END` arrives.
    pub fn feed(&mut self, line: &str) -> Option<SyncSnapshot> {
        match self.section {
            Section::Map { remaining } => {
                self.current
                    .map_lines
                    .push(line.trim_end_matches('\r').to_string());
                self.section = Self::after(remaining, |remaining| Section::Map { remaining });
                None
            }
            Section::Players { remaining } => {
                if let Some(player) = parse_player_row(line) {
                    self.current.players.push(player);
                }
                self.section =
                    Self::after(remaining, |remaining| Section::Players { remaining });
                None
            }
            Section::Header => self.header(line.trim()),
        }
    }

    fn header(&mut self, line: &str) -> Option<SyncSnapshot> {
        if line == "END" {
            return Some(std::mem::take(&mut self.current));
        }

        let (keyword, rest) = line.split_once(' ').unwrap_or((line, ""));
        match keyword {
            "SELF" if !rest.trim().is_empty() => {
                self.current.self_id = Some(rest.trim().to_string());
            }
            "MAP" => {
                if let Some(count) = parse_count(rest) {
                    self.current.map_lines.clear();
                    if count > 0 {
                        self.section = Section::Map { remaining: count };
                    }
                }
            }
            "PLAYERS" => {
                if let Some(count) = parse_count(rest) {
                    self.current.players.clear();
                    if count > 0 {
                        self.section = Section::Players { remaining: count };
                    }
                }
            }
            _ => {}
        }
        None
    }

    fn after(remaining: usize, next: impl FnOnce(usize) -> Section) -> Section {
        if remaining > 1 {
            next(remaining - 1)
        } else {
            Section::Header
        }
    }
}

fn parse_count(rest: &str) -> Option<usize> {
    rest.split_whitespace().next()?.parse().ok()
}

// `id\tname\tx\ty`; malformed rows are skipped.
fn parse_player_row(line: &str) -> Option<RemotePlayer> {
    let mut fields = line.trim_end_matches('\r').split('\t');
    let id = fields.next()?.trim();
    let name = fields.next()?;
    let x = fields.next()?.trim().parse().ok()?;
    let y = fields.next()?.trim().parse().ok()?;
    if id.is_empty() {
        return None;
    }
    Some(RemotePlayer {
        id: id.to_string(),
        name: name.to_string(),
        position: Position::new(x, y),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_all(parser: &mut SnapshotParser, text: &str) -> Vec<SyncSnapshot> {
        text.lines().filter_map(|line| parser.feed(line)).collect()
    }

    #[test]
    fn move_line_is_newline_terminated() {
        assert_eq!(move_line(Position::new(4, -2)), "MOVE 4 -2\n");
    }

    #[test]
    fn full_block_becomes_one_snapshot() {
        let mut parser = SnapshotParser::new();
        let text = "SELF C000001\nMAP 2\n▤▤▤\n▤ ▤\r\nPLAYERS 2\nC000001\tAlice\t2\t3\nC000002\tBob\t7\t1\nEND\n";

        let snapshots = feed_all(&mut parser, text);

        assert_eq!(snapshots.len(), 1);
        let snapshot = &snapshots[0];
        assert_eq!(snapshot.self_id.as_deref(), Some("C000001"));
        assert_eq!(snapshot.map_lines, vec!["▤▤▤", "▤ ▤"]);
        assert_eq!(snapshot.players.len(), 2);
        assert_eq!(snapshot.players[1].name, "Bob");
        assert_eq!(snapshot.players[1].position, Position::new(7, 1));
    }

    #[test]
    fn map_rows_are_taken_verbatim_even_if_they_look_like_keywords() {
        let mut parser = SnapshotParser::new();

        let snapshots = feed_all(&mut parser, "MAP 2\nEND\n\nPLAYERS 0\nEND\n");

        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].map_lines, vec!["END", ""]);
    }

    #[test]
    fn malformed_player_rows_are_skipped_but_counted() {
        let mut parser = SnapshotParser::new();

        let snapshots = feed_all(
            &mut parser,
            "SELF C1\nMAP 0\nPLAYERS 3\nC2\tBob\nC3\tEve\tx\t1\nC4\tDan\t1\t2\nEND\n",
        );

        assert_eq!(snapshots[0].players.len(), 1);
        assert_eq!(snapshots[0].players[0].id, "C4");
    }

    #[test]
    fn consecutive_blocks_do_not_leak_into_each_other() {
        let mut parser = SnapshotParser::new();
        let text = "SELF C1\nMAP 1\n▤\nPLAYERS 1\nC1\tAl\t1\t1\nEND\nSELF C1\nMAP 0\nPLAYERS 0\nEND\n";

        let snapshots = feed_all(&mut parser, text);

        assert_eq!(snapshots.len(), 2);
        assert!(snapshots[1].map_lines.is_empty());
        assert!(snapshots[1].players.is_empty());
    }

    #[test]
    fn unknown_and_garbled_headers_are_ignored() {
        let mut parser = SnapshotParser::new();

        let snapshots = feed_all(&mut parser, "HELLO\nMAP lots\nSELF\n\nEND\n");

        assert_eq!(snapshots, vec![SyncSnapshot::default()]);
    }
}
