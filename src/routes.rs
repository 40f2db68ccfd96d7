use crate::{
    api::{attendance, event, schedule},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    let kiosk_limiter = build_limiter(config.rate_kiosk_per_min);
    let api_limiter = build_limiter(config.rate_api_per_min);

    // Kiosk terminals post swipes directly; per-IP rate limiting is the
    // only gate on this surface
    cfg.service(
        web::scope("/kiosk").service(
            web::resource("/badge")
                .wrap(kiosk_limiter)
                .route(web::post().to(event::record_event)),
        ),
    );

    // Reporting and administration
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(api_limiter)
            .service(
                web::scope("/events")
                    // /events
                    .service(web::resource("").route(web::get().to(event::list_events))),
            )
            .service(
                web::scope("/attendance")
                    // /attendance
                    .service(web::resource("").route(web::get().to(attendance::attendance_report))),
            )
            .service(
                web::scope("/schedules")
                    // /schedules
                    .service(
                        web::resource("")
                            .route(web::post().to(schedule::create_schedule))
                            .route(web::get().to(schedule::list_schedules)),
                    )
                    // /schedules/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(schedule::update_schedule))
                            .route(web::delete().to(schedule::delete_schedule)),
                    ),
            ),
    );
}
