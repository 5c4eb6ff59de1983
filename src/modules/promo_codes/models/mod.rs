pub mod promo_code;

pub use promo_code::{
    DiscountType, NewPromoCode, PromoCode, PromoCodeRow, PromoCodeUpdate, MAX_CODE_LEN,
};
