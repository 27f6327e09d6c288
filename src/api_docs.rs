use crate::api;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::wellness::list_passes,
        api::wellness::get_active,
        api::wellness::start_pass,
        api::wellness::complete_day,
        api::coupons::redeem,
    ),
    components(
        schemas(
            api::wellness::CompleteDayRequest,
            api::coupons::RedeemCouponRequest,
        )
    ),
    tags(
        (name = "wellness-pass", description = "Clinic wellness pass API")
    )
)]
pub struct ApiDoc;
