use crate::letter_pool::LetterPool;
use shared::RACK_SIZE;
use std::collections::HashMap;

/// A participant's name, rack of tiles and running score.
#[derive(Debug, Clone)]
pub struct Player {
    name: String,
    rack: Vec<char>,
    score: u32,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rack: Vec::with_capacity(RACK_SIZE),
            score: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rack(&self) -> &[char] {
        &self.rack
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Rack formatted for prompts, e.g. `[C, A, T]`.
    pub fn rack_display(&self) -> String {
        let tiles: Vec<String> = self.rack.iter().map(char::to_string).collect();
        format!("[{}]", tiles.join(", "))
    }

    /// Checks, case-insensitively, that every letter of `word` is available
    /// in the rack, counting repeated letters. The rack is not modified.
    pub fn can_form(&self, word: &str) -> bool {
        let mut counts: HashMap<char, usize> = HashMap::new();
        for tile in &self.rack {
            *counts.entry(*tile).or_insert(0) += 1;
        }

        for letter in word.chars().map(|c| c.to_ascii_uppercase()) {
            match counts.get_mut(&letter) {
                Some(count) if *count > 0 => *count -= 1,
                _ => return false,
            }
        }
        true
    }

    /// Removes the tiles spelling `word` from the rack. Re-validates first and
    /// leaves the rack untouched when the word cannot be formed.
    pub fn play(&mut self, word: &str) -> bool {
        if !self.can_form(word) {
            return false;
        }

        for letter in word.chars().map(|c| c.to_ascii_uppercase()) {
            if let Some(index) = self.rack.iter().position(|tile| *tile == letter) {
                self.rack.remove(index);
            }
        }
        true
    }

    /// Tops the rack back up to seven tiles, or as many as the pool still has.
    pub fn fill_rack(&mut self, pool: &LetterPool) {
        let needed = RACK_SIZE.saturating_sub(self.rack.len());
        self.rack.extend(pool.draw(needed));
    }

    /// Returns the whole rack to the pool, then draws a fresh one.
    pub fn redraw(&mut self, pool: &LetterPool) {
        pool.return_letters(self.rack.drain(..));
        self.fill_rack(pool);
    }

    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player_with_rack(letters: &str) -> Player {
        let pool = LetterPool::from_letters(letters.chars());
        let mut player = Player::new("tester");
        player.fill_rack(&pool);
        player
    }

    fn sorted(rack: &[char]) -> Vec<char> {
        let mut tiles = rack.to_vec();
        tiles.sort_unstable();
        tiles
    }

    #[test]
    fn test_player_creation() {
        let player = Player::new("alice");
        assert_eq!(player.name(), "alice");
        assert!(player.rack().is_empty());
        assert_eq!(player.score(), 0);
    }

    #[test]
    fn test_can_form_counts_repeats() {
        let player = player_with_rack("abc");
        assert!(player.can_form("cab"));
        assert!(player.can_form("CAB"));
        assert!(player.can_form("a"));
        assert!(!player.can_form("cabbage"));
        assert!(!player.can_form("aa"));
        assert!(!player.can_form("dog"));
    }

    #[test]
    fn test_can_form_does_not_mutate() {
        let player = player_with_rack("catxxxx");
        let before = sorted(player.rack());
        assert!(player.can_form("cat"));
        assert!(!player.can_form("cats"));
        assert_eq!(sorted(player.rack()), before);
    }

    #[test]
    fn test_play_removes_only_used_tiles() {
        let mut player = player_with_rack("catxxxx");
        assert!(player.play("cat"));
        assert_eq!(player.rack(), &['X', 'X', 'X', 'X']);
    }

    #[test]
    fn test_play_rejects_without_partial_mutation() {
        let mut player = player_with_rack("cat");
        let before = sorted(player.rack());
        assert!(!player.play("cats"));
        assert_eq!(sorted(player.rack()), before);
    }

    #[test]
    fn test_fill_rack_tops_up_to_seven() {
        let pool = LetterPool::with_seed(1);
        let mut player = Player::new("bob");

        player.fill_rack(&pool);
        assert_eq!(player.rack().len(), RACK_SIZE);
        assert_eq!(pool.remaining(), LetterPool::standard_size() - RACK_SIZE);

        player.fill_rack(&pool);
        assert_eq!(player.rack().len(), RACK_SIZE);
        assert_eq!(pool.remaining(), LetterPool::standard_size() - RACK_SIZE);
    }

    #[test]
    fn test_fill_rack_with_short_pool() {
        let pool = LetterPool::from_letters("xyz".chars());
        let mut player = Player::new("carol");
        player.fill_rack(&pool);
        assert_eq!(player.rack().len(), 3);
        assert!(pool.is_empty());
    }

    #[test]
    fn test_redraw_is_stable_in_size() {
        let pool = LetterPool::from_letters("abcde".chars());
        let mut player = Player::new("dave");
        player.fill_rack(&pool);

        player.redraw(&pool);
        assert_eq!(player.rack().len(), 5);
        player.redraw(&pool);
        assert_eq!(player.rack().len(), 5);
        assert_eq!(sorted(player.rack()), vec!['A', 'B', 'C', 'D', 'E']);
        assert!(pool.is_empty());
    }

    #[test]
    fn test_redraw_from_standard_pool() {
        let pool = LetterPool::with_seed(99);
        let mut player = Player::new("erin");
        player.fill_rack(&pool);
        let word: String = player.rack()[..2].iter().collect();
        assert!(player.play(&word));

        player.redraw(&pool);
        assert_eq!(player.rack().len(), RACK_SIZE);
        assert_eq!(
            pool.remaining() + player.rack().len(),
            LetterPool::standard_size() - 2
        );
    }

    #[test]
    fn test_add_score_accumulates() {
        let mut player = Player::new("frank");
        player.add_score(5);
        player.add_score(0);
        player.add_score(3);
        assert_eq!(player.score(), 8);
    }

    #[test]
    fn test_rack_display() {
        let player = player_with_rack("q");
        assert_eq!(player.rack_display(), "[Q]");
        assert_eq!(Player::new("empty").rack_display(), "[]");
    }
}
