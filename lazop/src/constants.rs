// Env values used by the open platform.
pub const LAZADA_APP_KEY: &str = "LAZADA_APP_KEY";
pub const LAZADA_APP_SECRET: &str = "LAZADA_APP_SECRET";
pub const LAZADA_REGION: &str = "LAZADA_REGION";
pub const LAZADA_ACCESS_TOKEN: &str = "LAZADA_ACCESS_TOKEN";

// OAuth lives on its own host, shared by every region.
pub const AUTHORIZE_URL: &str = "https://auth.lazada.com/oauth/authorize";
pub const ACCESS_TOKEN_URL: &str = "https://auth.lazada.com/rest/auth/token/create";
pub const REFRESH_TOKEN_URL: &str = "https://auth.lazada.com/rest/auth/token/refresh";

// Api names, resolved against the region endpoint.
pub const GET_BRANDS: &str = "/brands/get";
pub const CATEGORY_TREE: &str = "/category/tree/get";
pub const CATEGORY_ATTRIBUTES: &str = "/category/attributes/get";
pub const IMAGE_MIGRATE: &str = "/image/migrate";
pub const CREATE_PRODUCT: &str = "/product/create";
pub const UPDATE_PRODUCT: &str = "/product/update";
pub const GET_PRODUCTS: &str = "/products/get";

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded;charset=utf-8";
pub const XML_HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
