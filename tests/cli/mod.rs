mod local_files;
