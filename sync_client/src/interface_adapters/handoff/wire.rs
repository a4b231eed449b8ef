use crate::domain::StateSnapshot;
use std::fmt::Write;

pub const OK_REPLY: &[u8] = b"OK\n";

// Parse `MOVE <x> <y>`. The verb is case-insensitive; anything else yields None.
pub fn parse_move_line(line: &str) -> Option<(i32, i32)> {
    let mut parts = line.split_whitespace();
    let verb = parts.next()?;
    if !verb.eq_ignore_ascii_case("MOVE") {
        return None;
    }
    let x = parts.next()?.parse().ok()?;
    let y = parts.next()?.parse().ok()?;
    Some((x, y))
}

// Render one snapshot block: SELF, MAP + lines, PLAYERS + rows, END.
pub fn render_snapshot(self_id: &str, snapshot: &StateSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "SELF {self_id}");
    let _ = writeln!(out, "MAP {}", snapshot.map_lines.len());
    for line in &snapshot.map_lines {
        out.push_str(line.trim_end_matches(['\r', '\n']));
        out.push('\n');
    }
    let _ = writeln!(out, "PLAYERS {}", snapshot.players.len());
    for player in &snapshot.players {
        let _ = writeln!(
            out,
            "{}\t{}\t{}\t{}",
            player.id,
            sanitize_field(&player.name),
            player.x,
            player.y
        );
    }
    out.push_str("END\n");
    out
}

// Names travel inside a tab-separated row.
fn sanitize_field(value: &str) -> String {
    value.replace(['\t', '\r', '\n'], " ")
}
