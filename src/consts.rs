pub const GRAPH_API_URL: &str = "https://graph.facebook.com/v2.6/";
pub const PROFILE_FIELDS: &str = "first_name,last_name,profile_pic,locale,timezone,gender";

pub const GENERIC_TEMPLATE_TITLE_LENGTH_LIMIT: usize = 45;
pub const GENERIC_TEMPLATE_SUBTITLE_LENGTH_LIMIT: usize = 80;
pub const GENERIC_TEMPLATE_CALL_TO_ACTION_TITLE_LIMIT: usize = 20;
pub const GENERIC_TEMPLATE_CALL_TO_ACTION_ITEMS_LIMIT: usize = 3;
pub const GENERIC_TEMPLATE_BUBBLES_PER_MESSAGE_LIMIT: usize = 10;
pub const BUTTON_TEMPLATE_BUTTONS_LIMIT: usize = 3;

pub const DEFAULT_RECEIPT_CURRENCY: &str = "USD";
pub const WELCOME_MESSAGE_SUCCESS_RESULT: &str = "Successfully added new_thread's CTAs";

pub const SIGNATURE_SHA1_HEADER: &str = "x-hub-signature";
pub const SIGNATURE_SHA256_HEADER: &str = "x-hub-signature-256";
