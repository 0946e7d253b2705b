use ulid::Ulid;

/// Where the reducer gets ids for blocks it creates.
///
/// Live dispatch mints fresh ids and records them; replay feeds the recorded
/// ids back in the same order so a rebuilt collection keeps its handles.
pub trait IdSource {
    fn next_id(&mut self) -> Ulid;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FreshIds;

impl IdSource for FreshIds {
    fn next_id(&mut self) -> Ulid {
        Ulid::new()
    }
}

#[derive(Debug, Default)]
pub struct RecordingIds {
    minted: Vec<Ulid>,
}

impl RecordingIds {
    pub fn minted(&self) -> &[Ulid] {
        &self.minted
    }

    pub fn into_minted(self) -> Vec<Ulid> {
        self.minted
    }
}

impl IdSource for RecordingIds {
    fn next_id(&mut self) -> Ulid {
        let id = Ulid::new();
        self.minted.push(id);
        id
    }
}

pub struct ReplayIds<'a> {
    ids: std::slice::Iter<'a, Ulid>,
}

impl<'a> ReplayIds<'a> {
    pub fn new(ids: &'a [Ulid]) -> Self {
        Self { ids: ids.iter() }
    }
}

impl IdSource for ReplayIds<'_> {
    fn next_id(&mut self) -> Ulid {
        match self.ids.next() {
            Some(id) => *id,
            None => {
                tracing::warn!("replayed action minted more ids than were recorded");
                Ulid::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replay_returns_recorded_ids_in_order() {
        let mut rec = RecordingIds::default();
        let a = rec.next_id();
        let b = rec.next_id();
        assert_eq!(rec.minted(), &[a, b]);

        let minted = rec.into_minted();
        let mut replay = ReplayIds::new(&minted);
        assert_eq!(replay.next_id(), a);
        assert_eq!(replay.next_id(), b);
        // Exhausted: falls back to a fresh id.
        let c = replay.next_id();
        assert_ne!(c, a);
        assert_ne!(c, b);
    }
}
