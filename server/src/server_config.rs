pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const LEADERBOARD_SIZE: usize = 10;
pub const TOKEN_PREFIX: &str = "mock_token_for_";
