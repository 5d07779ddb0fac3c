mod extendible;
mod logging;
mod ordered;
mod scenarios;
