use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::core::{AppError, Result};
use crate::modules::promo_codes::services::{
    CreatePromoCodeRequest, PromoCodeService, UpdatePromoCodeRequest,
};

/// Query of `DELETE /admin/promo-codes?id=`
#[derive(Debug, Deserialize)]
pub struct DeletePromoCodeQuery {
    pub id: Option<String>,
}

/// GET /admin/promo-codes
pub async fn list_promo_codes(service: web::Data<PromoCodeService>) -> Result<HttpResponse> {
    let codes = service.list_codes().await?;
    Ok(HttpResponse::Ok().json(codes))
}

/// POST /admin/promo-codes
pub async fn create_promo_code(
    service: web::Data<PromoCodeService>,
    request: web::Json<CreatePromoCodeRequest>,
) -> Result<HttpResponse> {
    let code = service.create_code(&request).await?;
    Ok(HttpResponse::Created().json(code))
}

/// PUT /admin/promo-codes
pub async fn update_promo_code(
    service: web::Data<PromoCodeService>,
    request: web::Json<UpdatePromoCodeRequest>,
) -> Result<HttpResponse> {
    service.update_code(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}

/// DELETE /admin/promo-codes?id={id}
pub async fn delete_promo_code(
    service: web::Data<PromoCodeService>,
    query: web::Query<DeletePromoCodeQuery>,
) -> Result<HttpResponse> {
    let id = query
        .id
        .as_deref()
        .ok_or_else(|| AppError::validation("ID is required"))?
        .trim()
        .parse::<i64>()
        .map_err(|_| AppError::validation("Invalid promo code ID"))?;

    service.delete_code(id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}

/// Configure promo code routes (mounted under the admin scope)
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/promo-codes")
            .route(web::get().to(list_promo_codes))
            .route(web::post().to(create_promo_code))
            .route(web::put().to(update_promo_code))
            .route(web::delete().to(delete_promo_code)),
    );
}
