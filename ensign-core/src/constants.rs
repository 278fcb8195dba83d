//! Constants shared across Ensign.
//!
//! Record keys must match the values wallets write to ENS resolvers byte for byte.

// ═══════════════════════════════════════════════════════════════════════════════
// ETHEREUM CONSTANTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Pattern a raw hex address must match: `0x` followed by exactly 40 hex digits.
pub const ADDRESS_PATTERN: &str = r"^0x[a-fA-F0-9]{40}$";

/// ENS registry address (identical on mainnet and the supported test networks).
pub const ENS_REGISTRY_ADDRESS: &str = "0x00000000000C2E074eC69A0bFb2997BA6C7d2e1e";

// ═══════════════════════════════════════════════════════════════════════════════
// ENS TEXT RECORD KEYS
// ═══════════════════════════════════════════════════════════════════════════════

/// Text record pointing an ENS name at a token contract.
pub const TOKEN_RECORD_KEY: &str = "token";

/// Text record holding the avatar reference.
pub const AVATAR_RECORD_KEY: &str = "avatar";

/// Social record: Twitter handle.
pub const TWITTER_RECORD_KEY: &str = "com.twitter";

/// Social record: GitHub handle.
pub const GITHUB_RECORD_KEY: &str = "com.github";

/// Social record: Discord handle.
pub const DISCORD_RECORD_KEY: &str = "com.discord";

/// Social record: Telegram handle.
pub const TELEGRAM_RECORD_KEY: &str = "org.telegram";

/// Social record: e-mail address.
pub const EMAIL_RECORD_KEY: &str = "email";

/// Social record: website.
pub const URL_RECORD_KEY: &str = "url";

/// Vendor preference: slippage tolerance in percent.
pub const SLIPPAGE_RECORD_KEY: &str = "com.pancakeswap.slippage";

/// Vendor preference: UI theme.
pub const THEME_RECORD_KEY: &str = "com.pancakeswap.theme";

/// Vendor preference: expert mode toggle.
pub const EXPERT_MODE_RECORD_KEY: &str = "com.pancakeswap.expertMode";

/// Vendor preference: gas priority.
pub const GAS_RECORD_KEY: &str = "com.pancakeswap.gas";

// ═══════════════════════════════════════════════════════════════════════════════
// PREFERENCE BOUNDS
// ═══════════════════════════════════════════════════════════════════════════════

/// Lowest accepted slippage, in percent.
pub const MIN_SLIPPAGE_PERCENT: f64 = 0.0;

/// Highest accepted slippage, in percent.
pub const MAX_SLIPPAGE_PERCENT: f64 = 50.0;

// ═══════════════════════════════════════════════════════════════════════════════
// TIMING DEFAULTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Quiet period before raw text input is resolved.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// How long a successful `decimals()` verification stays cached.
pub const ERC20_CHECK_TTL_SECONDS: u64 = 60;

/// Retries allowed for a failed `decimals()` verification.
pub const ERC20_CHECK_MAX_RETRIES: u32 = 1;

/// Default TTL for cached ENS lookups.
pub const DEFAULT_LOOKUP_TTL_SECONDS: u64 = 300;

/// Default IPFS gateway used to turn avatar CIDs into URLs.
pub const DEFAULT_IPFS_GATEWAY: &str = "https://ipfs.io";
