use actix_governor::{
    governor::middleware::NoOpMiddleware, Governor, GovernorConfig, GovernorConfigBuilder,
    PeerIpKeyExtractor,
};
use actix_web::web;

use crate::{
    api::{attendance, deduction, employee, payroll, settings},
    config::Config,
};

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter config
    fn build_limiter(requests_per_min: u32) -> GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap()
    }

    let mutation_limiter = build_limiter(config.rate_mutation_per_min);
    let read_limiter = build_limiter(config.rate_read_per_min);

    cfg.service(
        web::scope(&config.api_prefix)
            .service(
                web::scope("/employees")
                    // /employees
                    .service(
                        web::resource("")
                            .wrap(Governor::new(&mutation_limiter))
                            .route(web::post().to(employee::create_employee))
                            .route(web::get().to(employee::list_employees)),
                    )
                    // /employees/{id}
                    .service(
                        web::resource("/{id}")
                            .wrap(Governor::new(&mutation_limiter))
                            .route(web::get().to(employee::get_employee))
                            .route(web::put().to(employee::update_employee))
                            .route(web::delete().to(employee::delete_employee)),
                    ),
            )
            .service(
                web::scope("/attendance")
                    // /attendance/summary
                    .service(
                        web::resource("/summary")
                            .wrap(Governor::new(&read_limiter))
                            .route(web::get().to(attendance::summary)),
                    )
                    // /attendance/daily-report
                    .service(
                        web::resource("/daily-report")
                            .wrap(Governor::new(&read_limiter))
                            .route(web::get().to(attendance::daily_report)),
                    )
                    // /attendance
                    .service(
                        web::resource("")
                            .wrap(Governor::new(&mutation_limiter))
                            .route(web::post().to(attendance::mark))
                            .route(web::get().to(attendance::list)),
                    ),
            )
            .service(
                web::scope("/deductions")
                    // /deductions/balance
                    .service(
                        web::resource("/balance")
                            .wrap(Governor::new(&read_limiter))
                            .route(web::get().to(deduction::balance)),
                    )
                    // /deductions
                    .service(
                        web::resource("")
                            .wrap(Governor::new(&mutation_limiter))
                            .route(web::post().to(deduction::create))
                            .route(web::get().to(deduction::list)),
                    ),
            )
            .service(
                web::scope("/payroll")
                    // /payroll/{employee_id}/breakdown
                    .service(
                        web::resource("/{employee_id}/breakdown")
                            .wrap(Governor::new(&read_limiter))
                            .route(web::get().to(payroll::breakdown)),
                    )
                    // /payroll/{employee_id}/settle
                    .service(
                        web::resource("/{employee_id}/settle")
                            .wrap(Governor::new(&mutation_limiter))
                            .route(web::post().to(payroll::settle)),
                    )
                    // /payroll/{employee_id}/payments
                    .service(
                        web::resource("/{employee_id}/payments")
                            .wrap(Governor::new(&read_limiter))
                            .route(web::get().to(payroll::payments)),
                    ),
            )
            .service(
                web::scope("/settings")
                    // /settings/{branch_id}
                    .service(
                        web::resource("/{branch_id}")
                            .wrap(Governor::new(&mutation_limiter))
                            .route(web::get().to(settings::get_settings))
                            .route(web::put().to(settings::update_settings)),
                    ),
            ),
    );
}
