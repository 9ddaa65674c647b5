use crate::{
    abstract_trait::coupon::{CouponServiceTrait, DynCouponRepository},
    domain::{
        coupon::normalize_code,
        requests::coupon::{CreateCouponRecordRequest, CreateCouponRequest},
        response::{api::ApiResponse, coupon::CouponResponse},
    },
    service::observe::Observer,
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use shared::{
    errors::ServiceError,
    utils::{Method, Metrics},
};
use std::sync::Arc;
use tracing::info;
use validator::{Validate, ValidationErrors};

fn validation_messages(errors: &ValidationErrors) -> Vec<String> {
    errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(message) => format!("{field}: {message}"),
                None => format!("{field}: {}", e.code),
            })
        })
        .collect()
}

#[derive(Clone)]
pub struct CouponService {
    repo: DynCouponRepository,
    observer: Observer,
}

impl CouponService {
    pub fn new(repo: DynCouponRepository, registry: &mut Registry) -> Self {
        let metrics = Arc::new(Metrics::new());
        metrics.register("coupon_service", registry);

        Self {
            repo,
            observer: Observer::new("coupon-service", metrics),
        }
    }
}

#[async_trait]
impl CouponServiceTrait for CouponService {
    async fn create_coupon(
        &self,
        req: &CreateCouponRequest,
    ) -> Result<ApiResponse<CouponResponse>, ServiceError> {
        let code = normalize_code(&req.code);

        self.observer
            .observe(
                Method::Post,
                "create_coupon",
                vec![KeyValue::new("coupon.code", code.clone())],
                async {
                    req.validate()
                        .map_err(|e| ServiceError::Validation(validation_messages(&e)))?;

                    let record = CreateCouponRecordRequest {
                        code: code.clone(),
                        discount_type: req.discount_type,
                        discount_value: req.discount_value,
                        minimum_spend: req.minimum_spend,
                        expires_at: req.expires_at,
                        max_redemptions: req.max_redemptions,
                    };

                    let coupon = self.repo.create_coupon(&record).await?;

                    info!("🎟️ Coupon {} created", coupon.code);

                    Ok(ApiResponse::success(
                        "Coupon created successfully",
                        CouponResponse::from(coupon),
                    ))
                },
            )
            .await
    }

    async fn find_coupon(&self, code: &str) -> Result<ApiResponse<CouponResponse>, ServiceError> {
        let code = normalize_code(code);

        self.observer
            .observe(
                Method::Get,
                "find_coupon",
                vec![KeyValue::new("coupon.code", code.clone())],
                async {
                    let coupon = self
                        .repo
                        .find_by_code(&code)
                        .await?
                        .ok_or_else(|| ServiceError::CouponNotFound(code.clone()))?;

                    Ok(ApiResponse::success(
                        "Coupon retrieved successfully",
                        CouponResponse::from(coupon),
                    ))
                },
            )
            .await
    }
}
