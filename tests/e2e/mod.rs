mod helpers;
mod metadata;
