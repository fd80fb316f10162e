mod guards;
mod register;
