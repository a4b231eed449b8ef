use crate::domain::{LocalPlayer, SyncApi};
use crate::use_cases::CommandSender;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

// Drain queued positions in order, one sequence number each.
// Returns the player bookkeeping once the position channel closes.
pub async fn run_position_reporter<A>(
    sender: CommandSender<A>,
    mut player: LocalPlayer,
    mut positions: mpsc::Receiver<(i32, i32)>,
) -> LocalPlayer
where
    A: SyncApi + ?Sized,
{
    while let Some((x, y)) = positions.recv().await {
        let cmd = player.next_move(x, y);
        match sender.send_with_retry(&cmd).await {
            Ok(ack) if ack.applied => {
                debug!(seq = cmd.sequence, x, y, "position applied");
            }
            Ok(_) => {
                debug!(seq = cmd.sequence, "position ignored as stale");
            }
            Err(err) => {
                warn!(seq = cmd.sequence, x, y, error = %err, "position report dropped");
            }
        }
    }

    info!(
        client_id = player.client_id(),
        last_seq = player.last_sequence(),
        "position reporter stopped"
    );
    player
}
