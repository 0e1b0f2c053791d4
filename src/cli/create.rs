use clap::Parser;

/// Arguments for create command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Clone without touching the application config:\n    sitestager create admin example.com staging admin_wp\n\n\
                  Clone a WordPress site:\n    sitestager create admin example.com staging admin_wp wordpress public_html/wp-config.php\n\n\
                  Clone a Laravel site with custom dotenv keys:\n    sitestager create admin shop.test dev admin_shop env public_html/.env DB_NAME DB_USER DB_PASS")]
pub struct CreateArgs {
    /// Panel user owning the site
    pub user: String,

    /// Domain of the live site
    pub domain: String,

    /// Subdomain label of the staging copy; characters outside [A-Za-z0-9-] are dropped
    pub prefix: String,

    /// Database of the live site
    pub database: String,

    /// Configuration type: manual, wordpress or env (anything else means manual)
    #[arg(default_value = "")]
    pub config_type: String,

    /// Config file path relative to the domain root, e.g. public_html/wp-config.php
    #[arg(default_value = "")]
    pub config_path: String,

    /// Dotenv key for the database name (default DB_DATABASE)
    #[arg(default_value = "")]
    pub name_key: String,

    /// Dotenv key for the database user (default DB_USERNAME)
    #[arg(default_value = "")]
    pub user_key: String,

    /// Dotenv key for the database password (default DB_PASSWORD)
    #[arg(default_value = "")]
    pub pass_key: String,
}
