use actix_web::web;

pub mod backend_health;
pub mod games;
pub mod leagues;
pub mod players;
pub mod sync;
pub mod tipps;

use crate::middleware::admin::AdminMiddleware;
use crate::middleware::auth::AuthMiddleware;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(backend_health::backend_health);

    cfg.service(
        web::scope("/players")
            .wrap(AuthMiddleware)
            .service(players::ensure_player)
            .service(players::get_player)
    );
    // "/today" is registered before "/{game_id}" so it is not taken for an id
    cfg.service(
        web::scope("/games")
            .wrap(AuthMiddleware)
            .service(games::create_game)
            .service(games::list_games)
            .service(games::today)
            .service(games::game_detail)
            .service(games::accept_invitation)
            .service(games::decline_invitation)
            .service(games::fixture_tipps)
    );
    cfg.service(
        web::scope("/tipps")
            .wrap(AuthMiddleware)
            .service(tipps::list_tipps)
            .service(tipps::submit_tipp)
            .service(tipps::update_tipp)
            .service(tipps::delete_tipp)
    );
    cfg.service(
        web::scope("/leagues")
            .wrap(AuthMiddleware)
            .service(leagues::list_leagues)
    );
    cfg.service(
        web::scope("/sync")
            .wrap(AuthMiddleware)
            .service(sync::refresh_now)
    );
    // Data synchronisation beyond today's refresh is admin only
    cfg.service(
        web::scope("/admin/sync")
            .wrap(AdminMiddleware)
            .service(sync::sync_fixtures)
            .service(sync::run_scheduled_update)
            .service(sync::recompute_scores)
            .service(sync::import_countries)
            .service(sync::import_leagues)
            .service(sync::import_teams)
    );
}
